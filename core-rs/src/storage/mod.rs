// storage/mod.rs - Rights record persistence

pub mod codec;

pub use codec::{load_record, save_record, JsonCodec, RecordFormat, RightsCodec, YamlCodec};
