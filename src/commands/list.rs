//! # List Command Implementation
//!
//! Prints the master path, the tree and database roots, and each target's
//! architectures and source flag. Touches nothing on disk.

use anyhow::Result;

use mirror_split::config::Config;

/// Execute the list mode.
pub fn execute(config: &Config) -> Result<()> {
    print!("{}", render(config));
    Ok(())
}

/// Render the listing as printed by [`execute`].
pub fn render(config: &Config) -> String {
    let mut out = format!(
        "Master path {}\nTrees at {}\nDBs at {}\n",
        config.ftp_path.display(),
        config.tree_root_path.display(),
        config.tree_database_path.display()
    );
    for target in config.targets() {
        out.push_str(&target.describe());
        out.push('\n');
    }
    out
}
