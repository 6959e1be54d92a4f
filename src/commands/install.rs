use crate::installer;
use anyhow::Result;

pub fn execute(shell: Option<&str>) -> Result<()> {
    installer::install(shell)
}
