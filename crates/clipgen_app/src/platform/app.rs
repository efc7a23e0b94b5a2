use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clipgen_core::{update, AppState, Msg};
use clipgen_logging::{clipgen_debug, clipgen_info, clipgen_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{parse_command, ShellCommand};
use super::ui::render;

/// How long quitting waits for requests and downloads that are still running.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(120);

/// Everything the main loop reacts to: shell input and engine completions.
pub enum LoopEvent {
    Input(Msg),
    /// One engine command finished. Downloads carry no message.
    Completed(Option<Msg>),
    Help,
    Quit,
    Rejected(String),
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    logging::initialize(config.log_destination);
    clipgen_info!(
        "Starting clipgen endpoint={} bucket={} download_dir={}",
        config.api_endpoint,
        config.gcs_bucket,
        config.download_dir.display()
    );

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(&config, loop_tx.clone())
        .context("failed to start the engine")?;
    spawn_stdin_reader(loop_tx);

    let mut shell = Shell::new(runner, io::stdout().lock());
    shell.greet()?;
    shell.run(&loop_rx)?;
    shell.drain(&loop_rx, SHUTDOWN_GRACE)?;

    clipgen_info!("Shutting down");
    Ok(())
}

/// Owns the state and applies every event to it in arrival order.
struct Shell<W> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Shell<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn greet(&mut self) -> io::Result<()> {
        print_lines(&mut self.out, &render::help_lines())?;
        print_lines(&mut self.out, &render::render(&self.state.view()))
    }

    /// Handle events until the user quits or input ends.
    fn run(&mut self, loop_rx: &mpsc::Receiver<LoopEvent>) -> io::Result<()> {
        while let Ok(event) = loop_rx.recv() {
            match event {
                LoopEvent::Input(msg) => self.dispatch(msg)?,
                LoopEvent::Completed(msg) => self.complete(msg)?,
                LoopEvent::Help => print_lines(&mut self.out, &render::help_lines())?,
                LoopEvent::Rejected(message) => {
                    writeln!(self.out, "? {message}")?;
                    self.out.flush()?;
                }
                LoopEvent::Quit => break,
            }
        }
        Ok(())
    }

    /// Wait for work already handed to the engine. Further input is ignored.
    fn drain(&mut self, loop_rx: &mpsc::Receiver<LoopEvent>, grace: Duration) -> io::Result<()> {
        if self.runner.outstanding() == 0 {
            return Ok(());
        }
        writeln!(
            self.out,
            "Waiting for {} unfinished request(s)...",
            self.runner.outstanding()
        )?;
        self.out.flush()?;

        let deadline = Instant::now() + grace;
        while self.runner.outstanding() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match loop_rx.recv_timeout(remaining) {
                Ok(LoopEvent::Completed(msg)) => self.complete(msg)?,
                Ok(_) => {}
                Err(_) => {
                    clipgen_warn!(
                        "Abandoning {} unfinished request(s) after {:?}",
                        self.runner.outstanding(),
                        grace
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    fn complete(&mut self, msg: Option<Msg>) -> io::Result<()> {
        self.runner.complete();
        match msg {
            Some(msg) => self.dispatch(msg),
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        clipgen_debug!("Dispatching {:?}", msg);
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() {
            print_lines(&mut self.out, &render::render(&self.state.view()))?;
        }
        Ok(())
    }
}

fn spawn_stdin_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let event = match parse_command(&line) {
                Ok(ShellCommand::Msg(msg)) => LoopEvent::Input(msg),
                Ok(ShellCommand::Help) => LoopEvent::Help,
                Ok(ShellCommand::Quit) => LoopEvent::Quit,
                Ok(ShellCommand::Empty) => continue,
                Err(err) => LoopEvent::Rejected(err.to_string()),
            };
            if loop_tx.send(event).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::Quit);
    });
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;

    use clipgen_core::{Msg, RequestStatus};
    use clipgen_engine::{
        ChannelEventSink, ClipDownloader, DownloadError, EngineHandle, GeneratedClip,
        GeneratedClips, GenerationClient, GenerationPayload, SavedClip, SubmissionError,
    };
    use pretty_assertions::assert_eq;

    use super::{LoopEvent, Shell};
    use crate::platform::effects::EffectRunner;

    /// Blocks the engine for `delay` before answering, like a slow server.
    struct SlowGenerator {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl GenerationClient for SlowGenerator {
        async fn generate(
            &self,
            _payload: &GenerationPayload,
        ) -> Result<GeneratedClips, SubmissionError> {
            thread::sleep(self.delay);
            Ok(GeneratedClips {
                is_video: true,
                clips: vec![GeneratedClip {
                    title: "Clip A".to_string(),
                    description: "first".to_string(),
                    tags: vec!["Intro".to_string()],
                }],
            })
        }
    }

    struct SlowDownloader {
        delay: Duration,
        saved: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ClipDownloader for SlowDownloader {
        async fn download(&self, title: &str, is_video: bool) -> Result<SavedClip, DownloadError> {
            thread::sleep(self.delay);
            self.saved.fetch_add(1, Ordering::SeqCst);
            Ok(SavedClip {
                object_key: clipgen_engine::object_key(title, is_video),
                path: PathBuf::from(clipgen_engine::saved_clip_filename(title)),
                byte_len: 3,
            })
        }
    }

    struct Harness {
        shell: Shell<Vec<u8>>,
        loop_tx: mpsc::Sender<LoopEvent>,
        loop_rx: mpsc::Receiver<LoopEvent>,
        saved: Arc<AtomicUsize>,
    }

    fn harness(generate_delay: Duration, download_delay: Duration) -> Harness {
        let (loop_tx, loop_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let saved = Arc::new(AtomicUsize::new(0));
        let engine = EngineHandle::new(
            Arc::new(SlowGenerator {
                delay: generate_delay,
            }),
            Arc::new(SlowDownloader {
                delay: download_delay,
                saved: saved.clone(),
            }),
            Arc::new(ChannelEventSink::new(event_tx)),
        )
        .unwrap();
        let runner = EffectRunner::start(engine, event_rx, loop_tx.clone());
        Harness {
            shell: Shell::new(runner, Vec::new()),
            loop_tx,
            loop_rx,
            saved,
        }
    }

    fn submit(h: &Harness) {
        let url = "https://www.youtube.com/watch?v=abc".to_string();
        h.loop_tx
            .send(LoopEvent::Input(Msg::UrlEdited(url)))
            .unwrap();
        h.loop_tx
            .send(LoopEvent::Input(Msg::SubmitClicked))
            .unwrap();
    }

    fn output(h: &Harness) -> String {
        String::from_utf8_lossy(&h.shell.out).into_owned()
    }

    #[test]
    fn quit_waits_for_a_running_generation() {
        let mut h = harness(Duration::from_millis(200), Duration::ZERO);
        submit(&h);
        h.loop_tx.send(LoopEvent::Quit).unwrap();

        h.shell.run(&h.loop_rx).unwrap();
        assert_eq!(h.shell.state.status(), RequestStatus::Waiting);
        assert_eq!(h.shell.runner.outstanding(), 1);

        h.shell.drain(&h.loop_rx, Duration::from_secs(10)).unwrap();
        assert_eq!(h.shell.state.status(), RequestStatus::Received);
        assert_eq!(h.shell.runner.outstanding(), 0);
        let printed = output(&h);
        assert!(printed.contains("Waiting for 1 unfinished request(s)..."));
        assert!(printed.contains("[1] Clip A"));
    }

    #[test]
    fn quit_waits_for_a_running_download() {
        let mut h = harness(Duration::ZERO, Duration::from_millis(200));
        submit(&h);
        match h.loop_rx.recv_timeout(Duration::from_secs(10)) {
            Ok(LoopEvent::Input(msg)) => h.shell.dispatch(msg).unwrap(),
            _ => panic!("expected url input"),
        }
        match h.loop_rx.recv_timeout(Duration::from_secs(10)) {
            Ok(LoopEvent::Input(msg)) => h.shell.dispatch(msg).unwrap(),
            _ => panic!("expected submit input"),
        }
        match h.loop_rx.recv_timeout(Duration::from_secs(10)) {
            Ok(LoopEvent::Completed(msg)) => h.shell.complete(msg).unwrap(),
            _ => panic!("expected generation result"),
        }
        assert_eq!(h.shell.state.status(), RequestStatus::Received);

        h.loop_tx
            .send(LoopEvent::Input(Msg::DownloadClicked { index: 0 }))
            .unwrap();
        h.loop_tx.send(LoopEvent::Quit).unwrap();
        h.shell.run(&h.loop_rx).unwrap();
        assert_eq!(h.saved.load(Ordering::SeqCst), 0);

        h.shell.drain(&h.loop_rx, Duration::from_secs(10)).unwrap();
        assert_eq!(h.saved.load(Ordering::SeqCst), 1);
        assert_eq!(h.shell.runner.outstanding(), 0);
    }

    #[test]
    fn drain_gives_up_after_the_grace_period() {
        let mut h = harness(Duration::from_secs(2), Duration::ZERO);
        submit(&h);
        h.loop_tx.send(LoopEvent::Quit).unwrap();
        h.shell.run(&h.loop_rx).unwrap();

        h.shell
            .drain(&h.loop_rx, Duration::from_millis(50))
            .unwrap();
        assert_eq!(h.shell.runner.outstanding(), 1);
        assert_eq!(h.shell.state.status(), RequestStatus::Waiting);
    }

    #[test]
    fn drain_returns_at_once_when_idle() {
        let mut h = harness(Duration::ZERO, Duration::ZERO);
        h.loop_tx.send(LoopEvent::Quit).unwrap();
        h.shell.run(&h.loop_rx).unwrap();

        h.shell.drain(&h.loop_rx, Duration::from_secs(10)).unwrap();
        assert_eq!(output(&h), "");
    }
}
