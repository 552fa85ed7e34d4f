use crate::cmd::open_store;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use pm33_core::state::CommandPaletteState;
use std::path::Path;

#[derive(Subcommand)]
pub enum PaletteSubcommand {
    /// Open or close the command palette
    Toggle,
    /// Set the palette search text
    Search { text: String },
    /// Record a command as recently used
    Recent { id: String },
    /// List the quick-action catalog and recent commands
    List,
}

pub fn run(root: &Path, subcmd: PaletteSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(root)?;

    match subcmd {
        PaletteSubcommand::Toggle => store.toggle_command_palette(),
        PaletteSubcommand::Search { text } => store.set_command_palette_search(text),
        PaletteSubcommand::Recent { id } => store.add_recent_command(id),
        PaletteSubcommand::List => {}
    }

    show(&store.state().command_palette, json)
}

fn show(palette: &CommandPaletteState, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(palette);
    }

    println!(
        "Palette: {}{}",
        if palette.is_open { "open" } else { "closed" },
        if palette.search_query.is_empty() {
            String::new()
        } else {
            format!("  search: {:?}", palette.search_query)
        }
    );

    let rows: Vec<Vec<String>> = palette
        .quick_actions
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.label.clone(),
                a.shortcut.clone().unwrap_or_default(),
                a.category.to_string(),
            ]
        })
        .collect();
    println!();
    print_table(&["ID", "LABEL", "SHORTCUT", "CATEGORY"], rows);

    if !palette.recent_commands.is_empty() {
        println!("\nRecent: {}", palette.recent_commands.join(", "));
    }
    Ok(())
}

pub fn toggle_sidebar(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(root)?;
    store.toggle_sidebar();
    let collapsed = store.state().sidebar_collapsed;
    if json {
        print_json(&serde_json::json!({ "sidebar_collapsed": collapsed }))
    } else {
        println!(
            "Sidebar {}.",
            if collapsed { "collapsed" } else { "expanded" }
        );
        Ok(())
    }
}
