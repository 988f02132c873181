//! Named line-plot logger bound to a visdom-compatible visualization server.

use std::time::Duration;

use serde::Serialize;

/// One trace of a line plot, a single point long.
#[derive(Serialize)]
struct Trace<'a> {
    x: [f64; 1],
    y: [f64; 1],
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    name: &'a str,
}

/// Title wrapper shared by the `layout` and `opts` fields.
#[derive(Serialize)]
struct PlotTitle<'a> {
    title: &'a str,
}

/// An append event for a named plot window.
#[derive(Serialize)]
struct AppendEvent<'a> {
    data: [Trace<'a>; 1],
    win: &'a str,
    layout: PlotTitle<'a>,
    opts: PlotTitle<'a>,
    eventtype: &'static str,
}

/// Fire-and-forget line-plot logger.
///
/// Each [`PlotLogger::log`] call appends one (x, y) point to a named window
/// on the visualization server. Transport failures are traced and swallowed:
/// plotting must never abort a training run.
pub struct PlotLogger {
    client: Option<reqwest::blocking::Client>,
    endpoint: String,
    title: String,
    window: String,
}

impl PlotLogger {
    /// Create a logger posting to `http://localhost:{port}` with the given
    /// plot title.
    ///
    /// Construction never fails: if the HTTP client cannot be built, the
    /// logger degrades to dropping points with a warning.
    pub fn new(port: u16, name: &str) -> Self {
        let window = format!("plot_{}", name.to_lowercase().replace(' ', "_"));
        let client = match reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
        {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(plot = %name, "failed to build plot HTTP client: {err}");
                None
            }
        };

        Self {
            client,
            endpoint: format!("http://localhost:{port}/events"),
            title: name.to_string(),
            window,
        }
    }

    /// Append one point to the plot. Errors are logged, never returned.
    pub fn log(&self, x: f64, y: f64) {
        let Some(client) = &self.client else {
            tracing::warn!(plot = %self.title, "plot client unavailable, dropping point");
            return;
        };

        let event = self.append_event(x, y);
        match client.post(&self.endpoint).json(&event).send() {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    plot = %self.title,
                    status = %response.status(),
                    "plot server rejected event"
                );
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(plot = %self.title, "failed to reach plot server: {err}");
            }
        }
    }

    fn append_event(&self, x: f64, y: f64) -> AppendEvent<'_> {
        AppendEvent {
            data: [Trace {
                x: [x],
                y: [y],
                kind: "line",
                mode: "lines",
                name: &self.title,
            }],
            win: &self.window,
            layout: PlotTitle { title: &self.title },
            opts: PlotTitle { title: &self.title },
            eventtype: "append",
        }
    }
}
