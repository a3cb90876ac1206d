use std::sync::Arc;

use crate::config::Config;
use crate::datetime::DateFormat;
use crate::http_server::render::Renderer;
use crate::ports::listing_store::ListingStore;

pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub renderer: Arc<dyn Renderer>,
    pub config: Config,
}

impl AppState {
    pub fn date_format(&self) -> DateFormat {
        self.config.display.date_format
    }
}
