use clap::Parser;
use color_eyre::Result;
use moviedash::chart_export::export_dashboard_charts;
use moviedash::cli::{apply_overrides, dataset_path, initial_selection, log_level};
use moviedash::error_display::user_message;
use moviedash::report::render_report;
use moviedash::{
    App, AppConfig, AppEvent, Args, Catalog, ConfigManager, DashboardOptions, DatasetCache,
    ExportSettings, GenreSelection, LoadOptions, Theme, APP_NAME,
};
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(std::time::Duration::from_millis(25))? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(std::time::Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

/// RUST_LOG wins over everything; otherwise --debug, then the config level. The dashboard
/// logs nothing without --debug since stderr shares the alternate screen.
fn init_logging(args: &Args, config: &AppConfig) {
    env_logger::Builder::new()
        .filter_level(log_level(args, config))
        .parse_default_env()
        .init();
}

fn handle_generate_config(args: &Args) -> Result<Option<()>> {
    if !args.generate_config {
        return Ok(None);
    }
    match ConfigManager::new(APP_NAME) {
        Ok(manager) => match manager.write_default_config(args.force) {
            Ok(path) => {
                println!("Configuration file written to: {}", path.display());
                Ok(Some(()))
            }
            Err(e) => {
                eprintln!("Error writing config: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error initializing config manager: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_batch(args: &Args, config: &AppConfig, catalog: &Catalog) -> Result<()> {
    if args.list_genres {
        for genre in catalog.genres() {
            println!("{}", genre);
        }
        return Ok(());
    }

    let selection = initial_selection(args);
    if let GenreSelection::Genre(name) = &selection {
        if !catalog.genres().contains(name) {
            log::warn!("genre '{}' does not occur in the dataset", name);
        }
    }
    let view = catalog.view(&selection, &DashboardOptions::from_config(config))?;

    if args.report {
        print!("{}", render_report(&view)?);
    }
    if let Some(dir) = &args.export_charts {
        let size = (config.chart.export_width, config.chart.export_height);
        for path in export_dashboard_charts(&view, dir, size)? {
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_generate_config(&args)? {
        return Ok(());
    }

    color_eyre::install()?;

    let mut config = match AppConfig::load(APP_NAME) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    apply_overrides(&mut config, &args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }
    init_logging(&args, &config);

    let Some(path) = dataset_path(&args, &config) else {
        eprintln!("Error: no dataset given. Pass the movies CSV path or set data.path in the config file.");
        std::process::exit(2);
    };

    let cache = DatasetCache::new(path, LoadOptions::from(&config.data));
    let catalog = match cache.get().and_then(|df| Catalog::prepare(&df)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", user_message(&e, Some(cache.path())));
            std::process::exit(1);
        }
    };

    if args.is_batch() {
        if let Err(e) = run_batch(&args, &config, &catalog) {
            eprintln!("Error: {}", user_message(&e, None));
            std::process::exit(1);
        }
        return Ok(());
    }

    let app = App::new(
        catalog,
        DashboardOptions::from_config(&config),
        Theme::from_config(&config.theme)?,
        ExportSettings::from_config(&config),
        &initial_selection(&args),
    )?;
    let terminal = ratatui::init();
    let result = run(terminal, app);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
