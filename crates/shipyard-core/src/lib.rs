//! Shipyard Core
//!
//! ディレクトリツリーから Dockerfile を発見し、近くに置かれた
//! version ファイルからイメージのバージョンタグを解決してビルドプランを作ります。

pub mod discovery;
pub mod error;
pub mod model;
pub mod registry;
pub mod version;

pub use discovery::*;
pub use error::*;
pub use model::*;
pub use registry::*;
pub use version::*;
