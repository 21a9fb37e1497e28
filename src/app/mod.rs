pub mod import_use_case;
pub mod ports;
pub mod scrape_use_case;
