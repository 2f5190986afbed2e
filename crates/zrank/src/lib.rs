mod codec;
mod error;
mod leaderboard;
mod status;
mod store;
mod time;
mod window;

pub use crate::codec::*;
pub use crate::error::*;
pub use crate::leaderboard::*;
pub use crate::status::*;
pub use crate::store::*;
pub use crate::time::*;
pub use crate::window::*;
