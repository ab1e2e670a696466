//! Theme commands.

use soft_stories_cms::SiteConfig;

use super::open;

/// Print the stored palette as a `:root` CSS rule.
#[allow(clippy::print_stdout)]
pub fn css(config: &SiteConfig) {
    let ctx = open(config);
    print!("{}", ctx.store().theme().to_css());
}
