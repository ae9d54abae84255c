use std::{
    io::{IsTerminal, Write},
    sync::atomic::{AtomicBool, Ordering},
};

use meteo_core::{RenderSink, WeatherView};

/// Writes progress to stderr (on a single rewritten line when it's a
/// terminal) and results to stdout.
#[derive(Debug)]
pub struct TerminalSink {
    interactive: bool,
    progress_shown: AtomicBool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stderr().is_terminal(),
            progress_shown: AtomicBool::new(false),
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn progress(&self, text: &str) {
        let mut err = std::io::stderr().lock();
        if self.interactive {
            let _ = write!(err, "\r\x1b[2K⏳ {text}");
            let _ = err.flush();
            self.progress_shown.store(true, Ordering::SeqCst);
        } else {
            let _ = writeln!(err, "{text}");
        }
    }

    fn message(&self, text: &str) {
        self.clear();
        println!("{text}");
    }

    fn clear(&self) {
        if self.progress_shown.swap(false, Ordering::SeqCst) {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "\r\x1b[2K");
            let _ = err.flush();
        }
    }

    fn render(&self, view: &WeatherView) {
        self.clear();
        print!("{}", format_view(view));
    }
}

pub fn format_view(view: &WeatherView) -> String {
    format!(
        "{location}\n\
         {temperature}  {icon} {description}\n\
         \n\
         Code        {code}\n\
         Feels like  {feels}\n\
         Wind        {wind}\n\
         Humidity    {humidity}\n\
         Observed    {observed}\n",
        location = view.location,
        temperature = view.temperature,
        icon = view.icon,
        description = view.description,
        code = view.code,
        feels = view.feels_like,
        wind = view.wind,
        humidity = view.humidity,
        observed = view.observed_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::CurrentWeather;

    #[test]
    fn format_view_lists_all_fields() {
        let current = CurrentWeather {
            temperature: 25.3,
            windspeed: 10.0,
            winddirection: 180.0,
            weathercode: 0,
            time: "2024-01-01T12:00".into(),
        };
        let out = format_view(&WeatherView::new(&current, "Cairo, Egypt"));

        assert!(out.starts_with("Cairo, Egypt\n25°C  ☀️ Clear sky\n"));
        assert!(out.contains("Code        0\n"));
        assert!(out.contains("Feels like  25.3 °C\n"));
        assert!(out.contains("Wind        10 km/h (180°)\n"));
        assert!(out.contains("Humidity    —\n"));
        assert!(out.contains("Observed    2024-01-01 12:00\n"));
    }
}
