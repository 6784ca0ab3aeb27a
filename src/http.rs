//! Shared outbound HTTP client construction.
//!
//! Every client built here ignores `http_proxy`/`https_proxy` and friends.
//! The bypass is per client; the process environment is left untouched.

use std::time::Duration;

/// Build a blocking HTTP agent with the given overall timeout and proxies bypassed.
pub fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .try_proxy_from_env(false)
        .build()
}

/// Collapse a ureq error into a single descriptive line.
pub fn describe_error(err: &ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, _) => format!("HTTP status {}", code),
        ureq::Error::Transport(t) => t.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Tiny blocking HTTP/1.1 fixtures for exercising clients without the internet.

    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve the given (status line, body) pairs to consecutive connections,
    /// then return every raw request received.
    pub fn serve_sequence(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_request(&mut stream));
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        (format!("http://{}", addr), handle)
    }

    /// Serve a single response.
    pub fn serve_once(status: &'static str, body: &str) -> (String, JoinHandle<Vec<String>>) {
        serve_sequence(vec![(status, body.to_string())])
    }

    /// A URL on localhost where nothing is listening.
    pub fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut reader = BufReader::new(stream);
        let mut head = String::new();
        let mut content_length = 0usize;

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            let end_of_head = line == "\r\n";
            head.push_str(&line);
            if end_of_head {
                break;
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();
        head.push_str(&String::from_utf8_lossy(&body));
        head
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{refused_url, serve_once};
    use super::*;

    #[test]
    fn test_agent_reaches_local_server() {
        let (url, handle) = serve_once("200 OK", "pong");
        let agent = build_agent(Duration::from_secs(2));
        let body = agent.get(&url).call().unwrap().into_string().unwrap();
        assert_eq!(body, "pong");
        assert_eq!(handle.join().unwrap().len(), 1);
    }

    #[test]
    fn test_describe_status_error() {
        let (url, handle) = serve_once("404 Not Found", "");
        let agent = build_agent(Duration::from_secs(2));
        let err = agent.get(&url).call().unwrap_err();
        assert_eq!(describe_error(&err), "HTTP status 404");
        handle.join().unwrap();
    }

    #[test]
    fn test_describe_transport_error() {
        let agent = build_agent(Duration::from_secs(2));
        let err = agent.get(&refused_url()).call().unwrap_err();
        assert!(!describe_error(&err).is_empty());
    }
}
