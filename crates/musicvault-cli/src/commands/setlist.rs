use anyhow::{Context, Result};
use musicvault_core::catalog::BandishCatalog;
use musicvault_core::model::{BandishId, KaryakramId};
use musicvault_core::Gateway;
use musicvault_setlist::{
    Composition, Direction, Freshness, Setlist, SetlistEditor, SetlistItem, SwapOutcome,
};
use std::sync::Arc;

#[derive(Debug, clap::Subcommand)]
pub enum SetlistAction {
    /// Show the setlist (the default)
    Show,
    /// Append a bandish to the end of the set
    Add { bandish: BandishId },
    /// Remove the item at a position; later positions keep their ordinals
    Remove { position: usize },
    /// Move the item at a position one place up or down
    Move {
        position: usize,
        #[arg(value_enum)]
        direction: MoveDirection,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Self::Up,
            MoveDirection::Down => Self::Down,
        }
    }
}

pub async fn run(
    event: KaryakramId,
    action: SetlistAction,
    gateway: Arc<dyn Gateway>,
) -> Result<()> {
    let mut editor = SetlistEditor::open(Arc::clone(&gateway), event).await?;

    let result = match action {
        SetlistAction::Show => {
            print_setlist(editor.setlist());
            return Ok(());
        }
        SetlistAction::Add { bandish } => {
            let bandish = BandishCatalog::new(gateway)
                .get(bandish)
                .await
                .context("Cannot add that bandish")?;
            let title = bandish.title.clone();
            let result = editor.append(Composition::from_bandish(bandish, None)).await;
            if result.is_ok() {
                println!("✓ Added {} at position {}", title, editor.setlist().len());
            }
            result
        }
        SetlistAction::Remove { position } => {
            let item = item_at(&editor, position)?;
            let (id, title) = (item.id, item.title().to_string());
            let result = editor.remove(id).await;
            if result.is_ok() {
                println!("✓ Removed {}", title);
            }
            result
        }
        SetlistAction::Move {
            position,
            direction,
        } => {
            let index = item_index(&editor, position)?;
            match editor.swap_adjacent(index, direction.into()).await {
                Ok(SwapOutcome::Unchanged) => {
                    println!("Already at the {} of the set.", edge(direction));
                    Ok(())
                }
                other => other.map(|_| ()),
            }
        }
    };

    println!();
    print_setlist(editor.setlist());
    result.context("The setlist was not fully saved")
}

fn edge(direction: MoveDirection) -> &'static str {
    match direction {
        MoveDirection::Up => "start",
        MoveDirection::Down => "end",
    }
}

fn item_index(editor: &SetlistEditor, position: usize) -> Result<usize> {
    let len = editor.setlist().len();
    match position.checked_sub(1) {
        Some(index) if index < len => Ok(index),
        _ => anyhow::bail!("No item at position {} (the set has {} items)", position, len),
    }
}

fn item_at(editor: &SetlistEditor, position: usize) -> Result<&SetlistItem> {
    let index = item_index(editor, position)?;
    editor
        .setlist()
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("No item at position {}", position))
}

/// Print the setlist with 1-based positions and the stored ordinals.
pub fn print_setlist(setlist: &Setlist) {
    println!("Setlist for {} ({} items)", setlist.event().title, setlist.len());
    if let Freshness::Stale(reason) = setlist.freshness() {
        println!("  ⚠ Not in sync with the archive: {}", reason);
        println!("  Run 'musicvault setlist {}' to reload.", setlist.event_id());
    }
    if setlist.is_empty() {
        println!("  (empty)");
        return;
    }

    for (index, item) in setlist.items().iter().enumerate() {
        let detail = item
            .composition
            .as_ref()
            .map(|c| {
                format!(
                    "{} · {} · {}",
                    c.raga_name.as_deref().unwrap_or("General"),
                    c.kind,
                    c.tala
                )
            })
            .unwrap_or_default();
        let pending = if item.id.is_pending() { " (unsaved)" } else { "" };
        println!(
            "  {:>2}. {:<28} {}  #{}{}",
            index + 1,
            item.title(),
            detail,
            item.sequence_ordinal,
            pending
        );
    }
}
