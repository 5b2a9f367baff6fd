mod all;
mod canvas;
mod indicator;
mod log;
mod status;

use self::log::log;
use super::*;
use canvas::canvas;
use indicator::indicator;
use status::status;

pub use all::all as render;
