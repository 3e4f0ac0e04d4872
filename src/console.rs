//! Console presentation: prompts and number formatting.
//!
//! All user-facing formatting lives here — the core modules hand back
//! plain numeric/string values and never format anything themselves.

use std::io::{self, BufRead, Write};

/// Column width for the label side of aligned output rows.
pub const LABEL_WIDTH: usize = 28;

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Left-align a label to the shared column width.
pub fn fmt_label(label: &str) -> String {
    format!("{:<width$}", label, width = LABEL_WIDTH)
}

/// Render a fractional rate as a percentage with two decimals.
pub fn fmt_rate(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Render a USD amount with thousands separators and two decimals.
pub fn fmt_usd(value: f64) -> String {
    let negative = value < 0.0;
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-${grouped}.{frac_part}")
    } else {
        format!("${grouped}.{frac_part}")
    }
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

/// Read one line from a buffered reader, prompting on the given writer.
fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt for a float, re-prompting until the input parses.
pub fn read_f64<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<f64> {
    loop {
        let line = read_line(input, output, prompt)?;
        match line.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => writeln!(output, "Invalid input. Please enter a numeric value.")?,
        }
    }
}

/// Prompt for a non-negative integer, re-prompting until the input parses.
pub fn read_u32<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<u32> {
    loop {
        let line = read_line(input, output, prompt)?;
        match line.parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => writeln!(output, "Invalid input. Please enter a non-negative integer.")?,
        }
    }
}

/// Prompt for a string; an empty line yields the default.
pub fn read_str_or<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: &str,
) -> io::Result<String> {
    let line = read_line(input, output, prompt)?;
    if line.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(line)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
