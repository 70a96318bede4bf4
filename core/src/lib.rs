pub mod config;
pub mod formats;
pub mod infuser;
pub mod meta;
pub mod sfc;
pub mod squeeze;


pub use config::{InfuseConfig, MissingEntryPolicy};
pub use formats::{FormatError, Representation, Target};
pub use infuser::{infuse, InfuseError, Infuser, RebuiltFile};
pub use meta::{MessageEntry, MetaError, MetaLocaleMessage};
pub use sfc::{Block, BlockKind, DescriptorParser, ParseError, SfcDescriptor, SfcFile, SfcParser};
pub use squeeze::squeeze;
