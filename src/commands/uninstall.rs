use crate::installer;
use anyhow::Result;

pub fn execute() -> Result<()> {
    installer::uninstall()
}
