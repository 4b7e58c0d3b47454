use anyhow::{anyhow, Result};

use marginminer::commands::{self as cmd, Command};
use marginminer::dataset::Column;
use marginminer::filter::{BoundSide, Preset};

use crate::cli::{Commands, ScreenArgs};

/// Convert clap `Commands` into the internal command sequence when possible.
/// Returns Ok(Some(commands)) for commands that run through a session,
/// Ok(None) for commands handled directly by `main` (file listing, cache
/// setup, interactive mode), and Err on invalid arguments.
pub fn to_internal_commands(c: &Commands) -> Result<Option<Vec<Command>>> {
    match c {
        Commands::Screen(args) => screen_commands(args).map(Some),
        Commands::Segments => Ok(Some(vec![Command::Segments])),
        Commands::Tickers { file: None, segment } => {
            let mut commands = Vec::new();
            if let Some(name) = segment {
                commands.push(Command::Segment {
                    name: cmd::parse_segment_name(name),
                });
            }
            commands.push(Command::Tickers);
            Ok(Some(commands))
        }
        Commands::Tickers { file: Some(_), .. } => Ok(None),
        Commands::Sectors => Ok(None),
        Commands::Init => Ok(None),
        Commands::Interactive => Ok(None),
    }
}

/// Segment, then preset, then explicit bounds, then show.
fn screen_commands(args: &ScreenArgs) -> Result<Vec<Command>> {
    let mut commands = Vec::new();

    if let Some(name) = &args.segment {
        commands.push(Command::Segment {
            name: cmd::parse_segment_name(name),
        });
    }

    if let Some(name) = &args.preset {
        let preset = name.parse::<Preset>().map_err(|e| anyhow!(e))?;
        commands.push(Command::Preset { preset });
    }

    let bounds = [
        (Column::PriceToBook, BoundSide::Min, &args.pvp_min),
        (Column::PriceToBook, BoundSide::Max, &args.pvp_max),
        (Column::DividendYield, BoundSide::Min, &args.dy_min),
        (Column::DividendYield, BoundSide::Max, &args.dy_max),
        (Column::CashPercent, BoundSide::Min, &args.cash_min),
        (Column::CashPercent, BoundSide::Max, &args.cash_max),
        (Column::Price, BoundSide::Min, &args.price_min),
        (Column::Price, BoundSide::Max, &args.price_max),
        (Column::DailyLiquidity, BoundSide::Min, &args.liq_min),
        (Column::DailyLiquidity, BoundSide::Max, &args.liq_max),
    ];
    for (column, side, value) in bounds {
        if let Some(value) = value {
            commands.push(Command::Set {
                column,
                side,
                value: value.clone(),
            });
        }
    }

    commands.push(Command::Show);
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_screen_orders_segment_preset_bounds() {
        let args = ScreenArgs {
            segment: Some("Tijolo".to_string()),
            preset: Some("tijolo-anc".to_string()),
            dy_min: Some("0,09".to_string()),
            ..Default::default()
        };
        let converted = to_internal_commands(&Commands::Screen(args))
            .expect("conversion failed")
            .expect("screen runs through a session");
        assert_eq!(
            converted,
            vec![
                Command::Segment {
                    name: Some("Tijolo".to_string())
                },
                Command::Preset {
                    preset: Preset::BrickAnchor
                },
                Command::Set {
                    column: Column::DividendYield,
                    side: BoundSide::Min,
                    value: "0,09".to_string()
                },
                Command::Show,
            ]
        );
    }

    #[test]
    fn convert_screen_rejects_unknown_preset() {
        let args = ScreenArgs {
            preset: Some("bricks".to_string()),
            ..Default::default()
        };
        assert!(to_internal_commands(&Commands::Screen(args)).is_err());
    }

    #[test]
    fn convert_tickers_for_file_is_handled_by_main() {
        let c = Commands::Tickers {
            file: Some("Papel.csv".to_string()),
            segment: None,
        };
        assert!(to_internal_commands(&c).unwrap().is_none());
    }
}
