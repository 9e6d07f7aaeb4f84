mod controller;
mod flow;
mod util;

pub use util::TestSetupExt;
