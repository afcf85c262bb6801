extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate egot;
extern crate shlex;

use std::env;
use std::io::{ErrorKind, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use egot::prelude::*;
use egot::report;

const EXIT_NOT_FOUND: i32 = 1;
const EXIT_ERROR: i32 = 2;
const EXIT_ABORT: i32 = 130;

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            eprintln!("egot: {err}");
            std::process::exit(EXIT_ERROR)
        }
    }
}

fn parse_args() -> EgotOptions {
    let mut args = Vec::new();

    args.push(env::args().next().unwrap_or_else(|| String::from("egot")));
    args.extend(
        env::var("EGOT_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    for arg in env::args().skip(1) {
        args.push(arg);
    }

    EgotOptions::parse_from(args)
}

fn real_main() -> Result<i32> {
    let opts = parse_args();
    let mode = match opts.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("egot: {e}");
            return Ok(EXIT_ERROR);
        }
    };
    debug!("running {mode:?} against {}", opts.api_url);

    //------------------------------------------------------------------------------
    // interactive search
    if mode == Mode::Search {
        let output = Egot::run_with(&opts)?;
        if opts.print_query {
            println!("{}", output.query);
        }
        if let Some(navigation) = &output.navigation {
            println!("{}", navigation.name());
        }
        return Ok(if output.is_abort { EXIT_ABORT } else { 0 });
    }

    //------------------------------------------------------------------------------
    // one-shot commands
    let client = HttpApi::from_options(&opts)?;
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(one_shot(&opts, &client, mode));

    let mut stdout = std::io::stdout();
    let exit_code = match result {
        Ok((text, exit_code)) => {
            stdout.write_all(text.as_bytes())?;
            exit_code
        }
        Err(e) => {
            eprint!("{}", report::error_report(&e));
            if e.is_not_found() { EXIT_NOT_FOUND } else { EXIT_ERROR }
        }
    };
    stdout.flush()?;
    Ok(exit_code)
}

/// Run a non-interactive mode, returning the text to print and the exit code
async fn one_shot(opts: &EgotOptions, client: &HttpApi, mode: Mode) -> Result<(String, i32), ApiError> {
    let listed = |text: String, len: usize| (text, if len == 0 { EXIT_NOT_FOUND } else { 0 });
    match mode {
        Mode::Lookup(name) => {
            let mut page = DetailPage::from_options(name, opts);
            let state = page
                .load(client, |progress| info!("{}", progress.message()))
                .await;
            match state {
                DetailState::Loaded(celebrity) => Ok((report::celebrity_report(celebrity), 0)),
                DetailState::Failed(e) => Err(e.clone()),
                DetailState::Loading(_) => Err(ApiError::Timeout),
            }
        }
        Mode::CloseToEgot => {
            let celebrities = client.close_to_egot(opts.limit).await?;
            Ok(listed(report::progress_listing(&celebrities), celebrities.len()))
        }
        Mode::EgotWinners => {
            let celebrities = client.egot_winners(opts.limit).await?;
            Ok(listed(report::progress_listing(&celebrities), celebrities.len()))
        }
        Mode::NoAwards => {
            let celebrities = client.no_awards(opts.limit).await?;
            Ok(listed(report::basic_listing(&celebrities), celebrities.len()))
        }
        Mode::OscarRace(year) => {
            let ceremony = client.oscar_ceremony(year).await?;
            Ok((report::ceremony_report(&ceremony), 0))
        }
        Mode::OscarYears => {
            let years = client.oscar_years().await?;
            Ok(listed(report::years_listing(&years), years.len()))
        }
        Mode::Check => {
            client.health().await?;
            Ok((format!("{} is up\n", client.base_url()), 0))
        }
        Mode::Search => unreachable!("the interactive search is not a one-shot command"),
    }
}
