mod address;
mod flag;
mod operation;
mod time;
mod version;

pub use self::{address::*, flag::*, operation::*, time::*, version::*};
