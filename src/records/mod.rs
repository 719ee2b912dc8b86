pub mod assets;
pub mod engine;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod ranking;
pub mod render;

pub use assets::{AssetError, AssetResolver};
pub use engine::{PeopleView, RecordsEngine, RecordsOptions, UrlUpdate, PERSON_PARAM};
pub use loader::{load_records, parse_records, LoadError, RecordSource, RecordsError, SchemaError};
pub use model::{LoadReport, ParsedRecord, Record, RejectReason, RejectedRecord, Status};
pub use normalize::{normalize_all, normalize_record};
pub use ranking::{compare_records, group_by_person, ordinal, Leader, Medal};
