// Copyright (C) 2020-2026 Andy Kurnia.

use rtstats::{clock, error, logging, realtime_value, return_error, rlhelper};

type ShellValue = realtime_value::RealtimeValue<f64, f64, clock::ManualClock>;

static HELP: &str = "\
update <value>...   observe values at the current time
advance <seconds>   move the clock forward
fail on|off         make clock reads fail (updates are then skipped)
clear               clear history, keeping the last mean
show                print value, mean, std, weight, time
json                print the same as json
halflife <seconds>  start over with a new half-life
source <file>       run commands from a file
exit";

fn parse_f64(s: &str) -> error::Returns<f64> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => {
            return_error!(format!("not a number: {}", s));
        }
    }
}

fn show(rv: &ShellValue) {
    println!(
        "t={:.6}s {}",
        rv.clock().nanos() as f64 * clock::NANOS_TO_SECONDS,
        rv.snapshot()
    );
}

// returns false to exit.
fn run_command(rv: &mut ShellValue, args: &[String]) -> error::Returns<bool> {
    match args[0].as_str() {
        "help" => {
            println!("{}", HELP);
        }
        "exit" => {
            return Ok(false);
        }
        "update" => {
            if args.len() < 2 {
                return_error!("need value".into());
            }
            for arg in &args[1..] {
                rv.update(parse_f64(arg)?);
            }
            show(rv);
        }
        "advance" => {
            if args.len() != 2 {
                return_error!("need seconds".into());
            }
            let seconds = parse_f64(&args[1])?;
            if seconds < 0.0 {
                return_error!("time only moves forward".into());
            }
            rv.clock().advance_seconds(seconds);
            show(rv);
        }
        "fail" => match args.get(1).map(|s| s.as_str()) {
            Some("on") => rv.clock().set_failing(true),
            Some("off") => rv.clock().set_failing(false),
            _ => {
                return_error!("need on or off".into());
            }
        },
        "clear" => {
            rv.clear_history();
            show(rv);
        }
        "show" => {
            show(rv);
        }
        "json" => {
            println!("{}", serde_json::to_string(&rv.snapshot())?);
        }
        "halflife" => {
            if args.len() != 2 {
                return_error!("need seconds".into());
            }
            let half_life = parse_f64(&args[1])?;
            if half_life <= 0.0 {
                return_error!("half-life must be positive".into());
            }
            *rv = ShellValue::with_clock(half_life, rv.clock().clone());
            show(rv);
        }
        _ => {
            return_error!("invalid input, help for help".into());
        }
    }
    Ok(true)
}

fn main() -> error::Returns<()> {
    logging::init();
    let clock = clock::ManualClock::new();
    let mut rv = ShellValue::with_clock(realtime_value::DEFAULT_HALF_LIFE_SECONDS, clock);
    let mut rl = rlhelper::new_rl_editor()?;
    let mut cmd_stack = Vec::<(String, Option<(String, usize)>)>::new();
    loop {
        if let Some((line, source)) = cmd_stack.pop() {
            if let Some((filename, line_num)) = source {
                println!("{}:{}> {}", filename, line_num, line);
            }
            match shell_words::split(&line) {
                Ok(strings) => {
                    if strings.is_empty() {
                        continue;
                    }
                    if strings[0] == "source" {
                        if strings.len() > 1 {
                            match std::fs::read_to_string(&strings[1]) {
                                Ok(whole_file) => {
                                    let v = cmd_stack.len();
                                    for (line_num, line) in whole_file.lines().enumerate() {
                                        cmd_stack.push((
                                            line.to_string(),
                                            Some((strings[1].clone(), line_num + 1)),
                                        ));
                                    }
                                    cmd_stack[v..].reverse();
                                }
                                Err(err) => {
                                    println!("cannot open file: {:?}", err);
                                }
                            }
                        } else {
                            println!("need another arg");
                        }
                        continue;
                    }
                    match run_command(&mut rv, &strings) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(err) => {
                            println!("{}", err);
                        }
                    }
                }
                Err(err) => {
                    println!("Bad quoting: {:?}", err);
                }
            }
        } else {
            match rl.readline(">> ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    cmd_stack.push((line, None));
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }
    }

    Ok(())
}
