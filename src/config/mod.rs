mod settings;

pub use settings::{FriendicaConfig, GeneratorConfig, PumpIoConfig, Settings};
