/// pkg-config (`<BASENAME>.pc`) rendering
use crate::setup::PackageConfig;

pub fn render_pkgconfig(config: &PackageConfig) -> String {
    format!(
        "prefix={prefix}\n\
         exec_prefix={prefix}\n\
         srcdir={prefix}/share/apertium/{basename}\n\
         \n\
         Name: {basename}\n\
         Description: {description}\n\
         Version: {version}\n",
        prefix = config.prefix,
        basename = config.basename,
        description = config.description,
        version = config.version,
    )
}
