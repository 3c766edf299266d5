// demo/native-turtle/src/main.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs a turtle call log and renders the result to a PNG.

#[macro_use]
extern crate log;

use canvas_turtle::{
    CanvasRenderer, Color, RasterSurface, ReplayOutcome, Session, Speed, SurfaceConfig,
};
use clap::{App, Arg, ArgMatches};
use std::error::Error;
use std::fs;
use std::process;
use std::time::Instant;
use uturtle::Parser;

const DEFAULT_OUTPUT: &str = "turtle.png";

struct Options {
    input: String,
    output: String,
    speed: Speed,
    surface: SurfaceConfig,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Result<Options, Box<dyn Error>> {
        let defaults = SurfaceConfig::default();
        let speed = match matches.value_of("speed") {
            Some(speed) => Speed::new(speed.parse::<i64>()?)?,
            None => Speed::INSTANT,
        };
        let width = match matches.value_of("width") {
            Some(width) => width.parse::<u32>()?,
            None => defaults.width,
        };
        let height = match matches.value_of("height") {
            Some(height) => height.parse::<u32>()?,
            None => defaults.height,
        };
        let background = match matches.value_of("background") {
            Some(name) => {
                let color = Color::from_named(name);
                if color.to_color_u().is_none() {
                    return Err(format!("unknown background color `{}`", name).into());
                }
                color
            }
            None => defaults.background,
        };
        Ok(Options {
            input: matches.value_of("INPUT").unwrap_or("-").to_owned(),
            output: matches.value_of("output").unwrap_or(DEFAULT_OUTPUT).to_owned(),
            speed,
            surface: SurfaceConfig {
                width,
                height,
                background,
            },
        })
    }
}

fn run(options: &Options) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(&options.input)?;
    let program = Parser::new().parse(&source)?;
    info!("{}: {} calls", options.input, program.len());

    let mut session = Session::new();
    let commands = session.run(&program)?;
    if !commands.has_drawing() {
        info!("nothing drawn");
    }

    let started = Instant::now();
    let mut renderer = CanvasRenderer::new(RasterSurface::new(&options.surface));
    let outcome = session
        .replay(&commands, options.speed.pacing())
        .run_blocking(&mut renderer, |outcome| {
            info!(
                "replay {:?} in {:.3}s",
                outcome,
                started.elapsed().as_secs_f64()
            );
        });
    if outcome != ReplayOutcome::Completed {
        return Err("replay did not complete".into());
    }

    renderer.surface().save(&options.output)?;
    info!("wrote {}", options.output);
    Ok(())
}

fn main() {
    env_logger::init();

    let matches = App::new("turtle-demo")
        .about("Replays a turtle call log onto a canvas")
        .arg(
            Arg::with_name("INPUT")
                .help("Call log, one call per line")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("PNG to write")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("speed")
                .short("s")
                .long("speed")
                .value_name("0-10")
                .help("Animation speed, 10 draws instantly")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("PIXELS")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("PIXELS")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("background")
                .long("background")
                .value_name("COLOR")
                .takes_value(true),
        )
        .get_matches();

    let result = Options::from_matches(&matches).and_then(|options| run(&options));
    if let Err(err) = result {
        error!("{}", err);
        eprintln!("turtle-demo: {}", err);
        process::exit(1);
    }
}
