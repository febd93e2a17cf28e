/// Output rendering: the Makefile and the pkg-config file
pub mod makefile;
pub mod pkgconfig;

pub use makefile::{render_makefile, MakefileInputs};
pub use pkgconfig::render_pkgconfig;
