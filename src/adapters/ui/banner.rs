//! Startup banner: "MEAL-PLAN" in figlet's standard font, fading from chili red to basil green.

use crossterm::QueueableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{self, Write, stdout};

const BANNER_TEXT: &str = "MEAL-PLAN";

type Rgb = (u8, u8, u8);

const CHILI_RED: Rgb = (0xe6, 0x39, 0x46);
const BASIL_GREEN: Rgb = (0x2a, 0x9d, 0x8f);

fn mix(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    (channel(from.0, to.0), channel(from.1, to.1), channel(from.2, to.2))
}

/// One colour per line, first line red, last line green.
fn gradient(lines: usize) -> Vec<Rgb> {
    match lines {
        0 => Vec::new(),
        1 => vec![BASIL_GREEN],
        n => (0..n)
            .map(|i| mix(CHILI_RED, BASIL_GREEN, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

fn render_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(BANNER_TEXT).map(|fig| fig.to_string()))
        .unwrap_or_else(|| BANNER_TEXT.to_string())
}

fn paint(out: &mut impl Write, (r, g, b): Rgb, text: &str) -> io::Result<()> {
    out.queue(SetForegroundColor(Color::Rgb { r, g, b }))?
        .queue(Print(text))?
        .queue(Print("\r\n"))?
        .queue(ResetColor)?;
    Ok(())
}

fn write_banner(out: &mut impl Write) -> io::Result<()> {
    let art = render_art();
    let lines: Vec<&str> = art.lines().filter(|l| !l.trim().is_empty()).collect();
    for (line, colour) in lines.iter().zip(gradient(lines.len())) {
        paint(out, colour, line)?;
    }
    let tagline = format!(
        "v{}  weekly meals + shopping list",
        env!("CARGO_PKG_VERSION")
    );
    paint(out, BASIL_GREEN, &tagline)?;
    out.flush()
}

/// Print the banner and version tagline. Terminal errors are ignored.
pub fn print_welcome() {
    let _ = write_banner(&mut stdout());
}
