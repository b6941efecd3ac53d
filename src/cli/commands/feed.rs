use crate::cli::core::{parse_amount, usage, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::CommandEntry;
use crate::core::services::FeedService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "feed",
        "Ingredient prices for feed formulation",
        "feed [list|set <ingredient> <price_per_kg>|paste <line>...|reset|commercial <bag_price> <bag_weight_kg>]",
        cmd_feed,
    )]
}

fn cmd_feed(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("list") => list_ingredients(context),
        Some("set") => {
            if args.len() < 3 {
                return Err(usage("feed set <ingredient> <price_per_kg>"));
            }
            let (name, price) = args[1..].split_at(args.len() - 2);
            let price = parse_amount(price[0], "price per kg")?;
            let name = name.join(" ");
            context.manager.set_ingredient_price(&name, price)?;
            context.persist_config()?;
            io::print_success(format!("{} now costs {}/kg.", name.trim(), context.money(price)));
            Ok(())
        }
        Some("paste") => {
            if args.len() < 2 {
                return Err(usage("feed paste \"Milho 1,50\" \"Farelo de Soja 3,10\""));
            }
            let input = args[1..].join("\n");
            let applied = context.manager.apply_quick_input(&input);
            if applied == 0 {
                io::print_warning("Nothing understood. Format: 'Milho 1.50'");
                return Ok(());
            }
            context.persist_config()?;
            io::print_success(format!("{applied} prices updated."));
            Ok(())
        }
        Some("reset") => {
            context.manager.reset_ingredients();
            context.persist_config()?;
            io::print_success("Ingredient prices restored to defaults.");
            Ok(())
        }
        Some("commercial") => {
            if args.len() < 3 {
                return Err(usage("feed commercial <bag_price> <bag_weight_kg>"));
            }
            let bag_price = parse_amount(args[1], "bag price")?;
            let bag_weight = parse_amount(args[2], "bag weight")?;
            let per_kg = FeedService::commercial_price_per_kg(bag_price, bag_weight);
            io::print_info(format!("Commercial feed costs {}/kg.", context.money(per_kg)));
            Ok(())
        }
        Some(other) => Err(usage(&format!(
            "feed [list|set|paste|reset|commercial] (unknown action `{other}`)"
        ))),
    }
}

fn list_ingredients(context: &ShellContext) -> CommandResult {
    let rows: Vec<Vec<String>> = context
        .manager
        .state()
        .ingredients
        .iter()
        .map(|ingredient| {
            vec![
                ingredient.name.clone(),
                context.money(ingredient.price_per_kg),
            ]
        })
        .collect();
    output_section("Ingredients");
    table(&["Ingredient", "Price/kg"], &rows);
    Ok(())
}
