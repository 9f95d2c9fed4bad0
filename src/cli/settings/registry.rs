use crate::cli::settings::handlers::{BaseUrlHandler, DefaultModelHandler, PreambleFileHandler};
use crate::cli::settings::SettingHandler;

pub struct SettingRegistry {
    handlers: Vec<Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(DefaultModelHandler),
                Box::new(BaseUrlHandler),
                Box::new(PreambleFileHandler),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.key() == key)
            .map(|handler| handler.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|handler| handler.key())
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
