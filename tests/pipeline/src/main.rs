fn main() {
    println!("Run `cargo test -p pipeline` to execute the end-to-end pipeline tests.");
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use craftwatch_classifier::{Classifier, RulePatterns};
    use craftwatch_dispatcher::{DispatchStats, Dispatcher};
    use craftwatch_game_log::{LogTailer, RawLine, TailerConfig};
    use craftwatch_protocol::{COLOR_GREEN, COLOR_YELLOW};
    use craftwatch_webhook::{Client, ClientConfig};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    type Bodies = Arc<Mutex<Vec<serde_json::Value>>>;

    fn append(path: &Path, text: &str) {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    /// Reads one request and returns its JSON body.
    async fn read_body(stream: &mut TcpStream) -> serde_json::Value {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-request");
            buf.extend_from_slice(&chunk[..n]);

            let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let length: usize = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            let body_start = head_end + 4;
            if buf.len() >= body_start + length {
                return serde_json::from_slice(&buf[body_start..body_start + length]).unwrap();
            }
        }
    }

    /// Webhook endpoint answering each request with the next status in
    /// `statuses`, then 204 forever. Rate-limited requests carry a zero wait.
    async fn webhook(statuses: Vec<u16>) -> (String, Bodies) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!(
            "http://{}/api/webhooks/1/token",
            listener.local_addr().unwrap()
        );
        let bodies: Bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&bodies);

        tokio::spawn(async move {
            let mut statuses = statuses.into_iter();
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let body = read_body(&mut stream).await;
                let status = statuses.next().unwrap_or(204);
                if status != 429 {
                    recorded.lock().unwrap().push(body);
                }
                let resp = format!(
                    "HTTP/1.1 {status} Mock\r\nRetry-After: 0\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, bodies)
    }

    async fn wait_for(bodies: &Bodies, count: usize) -> Vec<serde_json::Value> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let seen = bodies.lock().unwrap().clone();
            if seen.len() >= count || Instant::now() > deadline {
                return seen;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Starts tailer and dispatcher against `log` and `url`, wired like the binary.
    fn start(log: &Path, url: &str) -> (CancellationToken, tokio::task::JoinHandle<()>) {
        let classifier = Arc::new(Classifier::new(&RulePatterns::default()).unwrap());
        let chat = Arc::clone(&classifier);
        let tailer = LogTailer::open(
            log,
            TailerConfig {
                poll_interval: Duration::from_millis(20),
                follow_rotation: true,
                echo: false,
            },
        )
        .unwrap()
        .with_filter(Box::new(move |line: &str| !chat.is_chat(line)));

        let client = Client::new(url, ClientConfig::default()).unwrap();
        let dispatcher = Dispatcher::new(classifier, client);

        let (tx, rx) = mpsc::channel(2);
        let cancel = CancellationToken::new();
        let tail = tokio::spawn(tailer.run(tx, cancel.clone()));
        let dispatch = tokio::spawn(dispatcher.run(rx, cancel.clone()));

        let handle = tokio::spawn(async move {
            tail.await.unwrap().unwrap();
            dispatch.await.unwrap();
        });
        (cancel, handle)
    }

    #[tokio::test]
    async fn appended_lines_become_webhook_posts() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        append(
            tmp.path(),
            "[11:00:00] [Server thread/INFO]: Old joined the game\n",
        );

        let (url, bodies) = webhook(Vec::new()).await;
        let (cancel, handle) = start(tmp.path(), &url);

        tokio::time::sleep(Duration::from_millis(50)).await;
        append(
            tmp.path(),
            "[12:00:00] [Server thread/INFO]: Steve joined the game\n\
             [12:00:05] [Server thread/INFO]: <Steve> Alex joined the game\n\
             [12:00:06] [Server thread/INFO]: Preparing level \"world\"\n\
             [12:05:00] [Server thread/INFO]: Steve has made the advancement [Stone Age]\n",
        );

        let seen = wait_for(&bodies, 2).await;
        // Give any stray delivery a chance to show up before asserting.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let seen_after = bodies.lock().unwrap().clone();
        assert_eq!(seen, seen_after);

        assert_eq!(
            seen,
            vec![
                json!({
                    "content": "",
                    "embeds": [{
                        "title": "Steve joined the game",
                        "description": "",
                        "color": COLOR_YELLOW,
                    }],
                }),
                json!({
                    "content": "",
                    "embeds": [{
                        "title": "Steve has made the advancement",
                        "description": "Stone Age",
                        "color": COLOR_GREEN,
                    }],
                }),
            ]
        );

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("pipeline did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn rate_limited_delivery_keeps_order() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let (url, bodies) = webhook(vec![429, 429]).await;
        let (cancel, handle) = start(tmp.path(), &url);

        append(
            tmp.path(),
            "[12:00:00] [Server thread/INFO]: Steve joined the game\n\
             [12:00:01] [Server thread/INFO]: Alex joined the game\n\
             [12:00:02] [Server thread/INFO]: Steve left the game\n",
        );

        let titles: Vec<String> = wait_for(&bodies, 3)
            .await
            .iter()
            .map(|b| b["embeds"][0]["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Steve joined the game",
                "Alex joined the game",
                "Steve left the game",
            ]
        );

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("pipeline did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn error_status_counts_as_reached_not_failed() {
        let (url, bodies) = webhook(vec![500]).await;
        let classifier = Arc::new(Classifier::new(&RulePatterns::default()).unwrap());
        let client = Client::new(&url, ClientConfig::default()).unwrap();
        let mut dispatcher = Dispatcher::new(classifier, client);

        dispatcher
            .dispatch(RawLine::new("[12:00:00] [Server thread/INFO]: Steve joined the game"))
            .await;

        assert_eq!(
            dispatcher.stats(),
            DispatchStats {
                lines: 1,
                notified: 1,
                failed: 0,
            }
        );
        assert_eq!(bodies.lock().unwrap().len(), 1);
    }
}
