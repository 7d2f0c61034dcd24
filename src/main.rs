use std::sync::Arc;

use anyhow::{Context, Result};
use clima_core::{AppError, RegionError};
use clima_ui::{render, DisplayEvent, WeatherModel};
use clima_weather::{location, WeatherbitProvider};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Comandos: r = actualizar ubicacion, a = actualizacion automatica, \
l = listar departamentos, s <n|nombre> = seleccionar departamento, q = salir";

#[tokio::main]
async fn main() -> Result<()> {
    clima_core::init()?;

    let mut app = clima_core::App::new().inspect_err(|e| eprintln!("{}", e.user_message()))?;
    let config = app.config().clone();

    let provider = WeatherbitProvider::new(&config.weather)
        .context("Failed to create weather provider")?;
    let location =
        location::from_config(&config.location).context("Failed to create location source")?;
    let mut model = WeatherModel::new(&config, location, Arc::new(provider))
        .inspect_err(|e| eprintln!("{}", e.user_message()))
        .context("Failed to create weather screen")?;

    tracing::info!("Clima screen started");
    println!("{HELP}");

    model.mount();
    println!("{}", render::render_state(model.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = model.next_event() => match event {
                Some(DisplayEvent::StateChanged) => {
                    println!("{}", render::render_state(model.state()));
                }
                Some(DisplayEvent::LocationNotice(error)) => {
                    println!("{}", render::render_notice(&error));
                }
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !handle_command(&mut model, line.trim()) {
                    break;
                }
            }
        }
    }

    model.shutdown();
    app.shutdown()?;
    Ok(())
}

/// Apply one user command. Returns false when the user quits.
fn handle_command(model: &mut WeatherModel, command: &str) -> bool {
    let (verb, argument) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(verb, rest)| (verb, rest.trim()));

    match verb {
        "" => {}
        "q" => return false,
        "r" => {
            model.refresh();
            println!("{}", render::render_state(model.state()));
        }
        "a" => {
            model.toggle_auto_refresh();
            println!("{}", render::render_state(model.state()));
        }
        "l" => println!("{}", render::render_regions(model.state().selected_region.name)),
        "s" => {
            let result = render::parse_region_choice(argument)
                .ok_or_else(|| RegionError::Unknown(argument.to_string()))
                .and_then(|name| model.select_region(name));
            match result {
                Ok(_) => println!("{}", render::render_state(model.state())),
                Err(e) => {
                    tracing::debug!("Rejected selection: {}", e);
                    println!("{}", AppError::from(e).user_message());
                }
            }
        }
        _ => println!("{HELP}"),
    }
    true
}
