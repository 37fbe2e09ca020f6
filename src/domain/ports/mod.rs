mod image_fetcher_port;

pub use image_fetcher_port::ImageFetcherPort;
