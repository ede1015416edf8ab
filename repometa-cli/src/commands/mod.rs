pub mod diff;
pub mod fetch;
pub mod frontmatter;
pub mod scaffold;
pub mod status;
