use anyhow::Result;
use musicvault_core::model::KaryakramId;
use musicvault_core::Gateway;
use musicvault_setlist::Setlist;
use std::sync::Arc;

use crate::tui;

pub async fn run(event: KaryakramId, gateway: Arc<dyn Gateway>) -> Result<()> {
    let setlist = Setlist::load(&*gateway, event).await?;

    if setlist.is_empty() {
        println!("The setlist for {} is empty.", setlist.event().title);
        println!("Add bandishes with 'musicvault setlist {} add <bandish-id>'.", event);
        return Ok(());
    }

    log::info!("Performing {} ({} items)", setlist.event().title, setlist.len());
    tui::run_performance(&setlist)
}
