use std::thread;
use std::time::Duration;

fn retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500..=599)
}

pub(crate) fn fetch_text(
    url: &str,
    connect_timeout: Duration,
    read_timeout: Duration,
    attempts: usize,
    retry_delay: Duration,
) -> Result<String, String> {
    let attempts = attempts.max(1);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(connect_timeout)
        .timeout_read(read_timeout)
        .timeout_write(read_timeout)
        .build();

    let mut last_failure = String::new();
    for attempt in 1..=attempts {
        if attempt > 1 {
            thread::sleep(retry_delay);
        }
        match agent.get(url).call() {
            Ok(response) => {
                return response
                    .into_string()
                    .map_err(|err| format!("download failed: could not decode response: {err}"));
            }
            Err(ureq::Error::Status(status, response)) => {
                let detail = status_detail(status, response);
                if !retryable_status(status) {
                    return Err(format!("download failed: {detail}"));
                }
                last_failure = detail;
            }
            Err(ureq::Error::Transport(err)) => {
                last_failure = format!("transport error: {err}");
            }
        }
    }

    Err(format!(
        "download failed after {attempts} attempt(s): {last_failure}"
    ))
}

fn status_detail(status: u16, response: ureq::Response) -> String {
    let body = response.into_string().unwrap_or_default();
    let excerpt: String = body.trim().chars().take(240).collect();
    if excerpt.is_empty() {
        format!("HTTP status {status}")
    } else {
        format!("HTTP status {status} ({excerpt})")
    }
}
