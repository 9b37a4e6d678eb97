use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::Registry;

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Print the palette as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn blocks(args: BlocksArgs) -> Result<()> {
    let palette = Registry::shared().list_by_category();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&palette)?);
        return Ok(());
    }

    for (category, definitions) in &palette {
        println!("{}", category.label().bright_blue().bold());
        for definition in definitions {
            println!(
                "  {:<18} {:<16} {}",
                definition.label.bright_white(),
                definition.block_type.tag().dimmed(),
                definition.description
            );
        }
        println!();
    }

    Ok(())
}
