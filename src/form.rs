//! Line based prediction form for the terminal.

use crate::gate::{self, RawInput};
use crate::pipeline::PipelineContext;
use std::io::{self, BufRead, Write};
use tracing::{debug, error};

/// Usage hint printed when a one-shot request does not have six fields.
pub const LINE_FORMAT: &str =
    "DepTime,ArrTime,Airline,Distance,WeatherConditions,PreviousFlightDelay";

/// Reads one answer, `None` on end of input.
fn ask<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(writer, "{}: ", prompt)?;
    writer.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

/// Prompts for flights until end of input or an empty departure time,
/// printing either the predicted label or the reason the request was rejected.
pub fn run<R: BufRead, W: Write>(
    context: &PipelineContext,
    mut reader: R,
    mut writer: W,
) -> io::Result<()> {
    let airline_prompt = format!(
        "Airline [{}]",
        context.airline_encoder().categories().join("/")
    );
    let weather_prompt = format!(
        "Weather Conditions [{}]",
        context.weather_encoder().categories().join("/")
    );

    loop {
        let dep_time = match ask(&mut reader, &mut writer, "Departure Time (HHMM)")? {
            Some(answer) if !answer.trim().is_empty() => answer,
            _ => return Ok(()),
        };
        let mut answers = vec![dep_time];
        for prompt in [
            "Arrival Time (HHMM)",
            airline_prompt.as_str(),
            "Distance (miles)",
            weather_prompt.as_str(),
            "Previous Flight Delay (0 or 1)",
        ] {
            match ask(&mut reader, &mut writer, prompt)? {
                Some(answer) => answers.push(answer),
                None => return Ok(()),
            }
        }

        let input = RawInput {
            dep_time: &answers[0],
            arr_time: &answers[1],
            airline: &answers[2],
            distance: &answers[3],
            weather: &answers[4],
            previous_delay: &answers[5],
        };
        answer(context, &input, &mut writer)?;
    }
}

/// Runs one request through the gate and prints the label, or the rejection
/// message. Returns whether a label was printed.
pub fn answer<W: Write>(
    context: &PipelineContext,
    input: &RawInput<'_>,
    mut writer: W,
) -> io::Result<bool> {
    match gate::predict_from_raw(context, input) {
        Ok(label) => {
            writeln!(writer, "{}", label)?;
            Ok(true)
        }
        Err(why) => {
            if why.is_request_local() {
                debug!("Rejected request: {}", why);
            } else {
                error!("Request failed: {}", why);
            }
            writeln!(writer, "Invalid Input: {}", why)?;
            Ok(false)
        }
    }
}

/// Answers a single comma separated request, as given on the command line.
pub fn predict_line<W: Write>(
    context: &PipelineContext,
    line: &str,
    mut writer: W,
) -> io::Result<bool> {
    match RawInput::from_csv_line(line) {
        Some(input) => answer(context, &input, writer),
        None => {
            debug!("Rejected request with wrong field count: {:?}", line);
            writeln!(writer, "Invalid Input: expected {}", LINE_FORMAT)?;
            Ok(false)
        }
    }
}
