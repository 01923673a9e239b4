//! Read-dispatch-print loop for the tuple space client.
//!
//! Output contract (stdout): the prompt, the usage text, `OK` markers and
//! returned tuples. Remote failures print nothing here; their detail only
//! shows up in the Gateway's debug diagnostics.

use std::io::Write;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::warn;
use tuplespaces_client::{Gateway, Outcome, TupleSpaces};

use super::grammar::{self, Command, USAGE};
use crate::input::LineSource;

/// Prompt shown before every line.
pub const PROMPT: &str = "> ";

/// Acknowledgement printed for a successful call.
const OK: &str = "OK";

/// Control flow for the REPL.
pub enum ControlFlow {
    Continue,
    Exit,
}

/// Interpreter state: the session's gateway, its input and its output.
pub struct Repl<S: TupleSpaces, I: LineSource, W: Write> {
    gateway: Gateway<S>,
    input: I,
    out: W,
}

impl<S: TupleSpaces, I: LineSource, W: Write> Repl<S, I, W> {
    pub fn new(gateway: Gateway<S>, input: I, out: W) -> Self {
        Self {
            gateway,
            input,
            out,
        }
    }

    /// Run until `exit`, end of input, or a fatal error.
    ///
    /// The gateway is closed before returning, whichever way the loop ends.
    pub async fn run(mut self) -> Result<()> {
        let result = self.run_loop().await;
        self.gateway.close();
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        while let Some(line) = self.input.read_line(PROMPT)? {
            match self.dispatch(grammar::parse(&line)).await? {
                ControlFlow::Continue => self.out.flush()?,
                ControlFlow::Exit => break,
            }
        }
        Ok(())
    }

    /// Execute one parsed command.
    pub async fn dispatch(&mut self, command: Command) -> Result<ControlFlow> {
        match command {
            Command::Put(tuple) => {
                if self.gateway.put(&tuple).await.is_success() {
                    writeln!(self.out, "{}\n", OK)?;
                }
            }
            Command::Read(pattern) => {
                let outcome = self.gateway.read(&pattern).await;
                self.print_tuple(outcome)?;
            }
            Command::Take(pattern) => {
                let client_id = self.gateway.config().client_id();
                let outcome = self.gateway.take(client_id, &pattern).await;
                self.print_tuple(outcome)?;
            }
            Command::GetTupleSpacesState => {
                let tuples = match self.gateway.get_state().await {
                    Outcome::Success(tuples) => {
                        writeln!(self.out, "{}", OK)?;
                        tuples
                    }
                    Outcome::Failure(_) => Vec::new(),
                };
                writeln!(self.out, "{}\n", format_state(&tuples))?;
            }
            Command::Sleep(seconds) => pause(seconds).await?,
            Command::Exit => return Ok(ControlFlow::Exit),
            Command::Invalid => writeln!(self.out, "{}", USAGE)?,
        }
        Ok(ControlFlow::Continue)
    }

    fn print_tuple(&mut self, outcome: Outcome<String>) -> Result<()> {
        if let Outcome::Success(tuple) = outcome {
            writeln!(self.out, "{}", OK)?;
            writeln!(self.out, "{}\n", tuple)?;
        }
        Ok(())
    }
}

/// Render a state snapshot as `[a, b, c]`.
pub fn format_state(tuples: &[String]) -> String {
    format!("[{}]", tuples.join(", "))
}

/// Block the session for `seconds`.
///
/// Ctrl+C during the pause aborts the whole session.
async fn pause(seconds: u64) -> Result<()> {
    let delay = tokio::time::sleep(Duration::from_secs(seconds));
    tokio::pin!(delay);

    tokio::select! {
        _ = &mut delay => Ok(()),
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => Err(anyhow!("interrupted during sleep")),
            Err(err) => {
                warn!(error = %err, "cannot listen for interrupts, sleeping anyway");
                delay.await;
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Piped;
    use async_trait::async_trait;
    use std::io::{self, Cursor};
    use std::sync::{Arc, Mutex};
    use proptest::prelude::*;
    use tonic::Status;
    use tuplespaces_client::{
        GetTupleSpacesStateRequest, GetTupleSpacesStateResponse, PutRequest, PutResponse,
        ReadRequest, ReadResponse, SessionConfig, TakeRequest, TakeResponse,
    };

    #[derive(Default)]
    struct Calls {
        log: Mutex<Vec<String>>,
        shutdowns: Mutex<usize>,
    }

    impl Calls {
        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn shutdowns(&self) -> usize {
            *self.shutdowns.lock().unwrap()
        }
    }

    /// In-memory tuple space that records every remote call.
    struct FakeSpaces {
        calls: Arc<Calls>,
        tuples: Mutex<Vec<String>>,
        down: bool,
    }

    impl FakeSpaces {
        fn new(calls: Arc<Calls>, tuples: &[&str]) -> Self {
            Self {
                calls,
                tuples: Mutex::new(tuples.iter().map(|t| t.to_string()).collect()),
                down: false,
            }
        }

        fn unreachable(calls: Arc<Calls>) -> Self {
            Self {
                down: true,
                ..Self::new(calls, &[])
            }
        }

        fn record(&self, call: String) -> tuplespaces_client::Result<()> {
            self.calls.log.lock().unwrap().push(call);
            if self.down {
                return Err(Status::unavailable("io exception").into());
            }
            Ok(())
        }

        fn find(&self, pattern: &str) -> tuplespaces_client::Result<usize> {
            self.tuples
                .lock()
                .unwrap()
                .iter()
                .position(|t| t == pattern)
                .ok_or_else(|| Status::not_found(format!("no tuple matches {pattern}")).into())
        }
    }

    #[async_trait]
    impl TupleSpaces for FakeSpaces {
        async fn put(&self, request: PutRequest) -> tuplespaces_client::Result<PutResponse> {
            self.record(format!("put {}", request.new_tuple))?;
            self.tuples.lock().unwrap().push(request.new_tuple);
            Ok(PutResponse {})
        }

        async fn read(&self, request: ReadRequest) -> tuplespaces_client::Result<ReadResponse> {
            self.record(format!("read {}", request.search_pattern))?;
            let index = self.find(&request.search_pattern)?;
            Ok(ReadResponse {
                result: self.tuples.lock().unwrap()[index].clone(),
            })
        }

        async fn take(&self, request: TakeRequest) -> tuplespaces_client::Result<TakeResponse> {
            self.record(format!("take {} {}", request.client_id, request.search_pattern))?;
            let index = self.find(&request.search_pattern)?;
            Ok(TakeResponse {
                result: self.tuples.lock().unwrap().remove(index),
            })
        }

        async fn get_tuple_spaces_state(
            &self,
            _request: GetTupleSpacesStateRequest,
        ) -> tuplespaces_client::Result<GetTupleSpacesStateResponse> {
            self.record("getTupleSpacesState".to_string())?;
            Ok(GetTupleSpacesStateResponse {
                tuple: self.tuples.lock().unwrap().clone(),
            })
        }

        fn shutdown(&self) {
            *self.calls.shutdowns.lock().unwrap() += 1;
        }
    }

    async fn session(service: FakeSpaces, script: &str) -> (Result<()>, String) {
        let gateway = Gateway::new(SessionConfig::new("localhost:2001", 7, false), service);
        let input = Piped::new(Cursor::new(script.to_string()), io::sink());
        let mut out = Vec::new();
        let result = Repl::new(gateway, input, &mut out).run().await;
        (result, String::from_utf8(out).unwrap())
    }

    fn usage_block() -> String {
        format!("{}\n", USAGE)
    }

    #[tokio::test]
    async fn test_put_issues_one_call_and_acknowledges() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(FakeSpaces::new(calls.clone(), &[]), "put <a,b>\n").await;

        result.unwrap();
        assert_eq!(out, "OK\n\n");
        assert_eq!(calls.log(), vec!["put <a,b>"]);
    }

    #[tokio::test]
    async fn test_malformed_tuples_never_reach_the_server() {
        let calls = Arc::new(Calls::default());
        let script = "put a\nread <a\ntake a>\nput <a> <b>\nread\n";
        let (result, out) = session(FakeSpaces::new(calls.clone(), &[]), script).await;

        result.unwrap();
        assert_eq!(out, usage_block().repeat(5));
        assert!(calls.log().is_empty());
    }

    #[tokio::test]
    async fn test_read_and_take_print_the_tuple() {
        let calls = Arc::new(Calls::default());
        let script = "read <a>\ntake <a>\n";
        let (result, out) = session(FakeSpaces::new(calls.clone(), &["<a>"]), script).await;

        result.unwrap();
        assert_eq!(out, "OK\n<a>\n\nOK\n<a>\n\n");
        assert_eq!(calls.log(), vec!["read <a>", "take 7 <a>"]);
    }

    #[tokio::test]
    async fn test_failed_read_prints_nothing() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(FakeSpaces::new(calls.clone(), &[]), "read <x>\n").await;

        result.unwrap();
        assert_eq!(out, "");
        assert_eq!(calls.log(), vec!["read <x>"]);
    }

    #[tokio::test]
    async fn test_failed_put_prints_nothing() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(FakeSpaces::unreachable(calls.clone()), "put <a>\n").await;

        result.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn test_state_renders_bracketed_list() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(
            FakeSpaces::new(calls.clone(), &["<a>", "<b>"]),
            "getTupleSpacesState\n",
        )
        .await;

        result.unwrap();
        assert_eq!(out, "OK\n[<a>, <b>]\n\n");
    }

    #[tokio::test]
    async fn test_empty_state_renders_empty_brackets() {
        let calls = Arc::new(Calls::default());
        let (_, out) = session(FakeSpaces::new(calls, &[]), "getTupleSpacesState\n").await;
        assert_eq!(out, "OK\n[]\n\n");
    }

    #[tokio::test]
    async fn test_failed_state_renders_empty_brackets() {
        let calls = Arc::new(Calls::default());
        let (_, out) = session(
            FakeSpaces::unreachable(calls.clone()),
            "getTupleSpacesState\n",
        )
        .await;
        assert_eq!(out, "[]\n\n");
        assert_eq!(calls.log(), vec!["getTupleSpacesState"]);
    }

    #[tokio::test]
    async fn test_sleep_is_local() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(FakeSpaces::new(calls.clone(), &[]), "sleep 0\n").await;

        result.unwrap();
        assert_eq!(out, "");
        assert!(calls.log().is_empty());
    }

    #[tokio::test]
    async fn test_bad_sleep_argument_prints_usage() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(FakeSpaces::new(calls.clone(), &[]), "sleep abc\n").await;

        result.unwrap();
        assert_eq!(out, usage_block());
        assert!(calls.log().is_empty());
    }

    #[tokio::test]
    async fn test_exit_stops_before_later_lines() {
        let calls = Arc::new(Calls::default());
        let (result, out) =
            session(FakeSpaces::new(calls.clone(), &[]), "exit\nput <a>\n").await;

        result.unwrap();
        assert_eq!(out, "");
        assert!(calls.log().is_empty());
        assert_eq!(calls.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_end_of_input_closes_once() {
        let calls = Arc::new(Calls::default());
        let (result, out) = session(FakeSpaces::new(calls.clone(), &[]), "").await;

        result.unwrap();
        assert_eq!(out, "");
        assert_eq!(calls.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_unknown_command_prints_usage() {
        let calls = Arc::new(Calls::default());
        let (_, out) = session(FakeSpaces::new(calls.clone(), &[]), "\nhello\n").await;
        assert_eq!(out, usage_block().repeat(2));
        assert!(calls.log().is_empty());
    }

    struct BrokenInput;

    impl LineSource for BrokenInput {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Err(anyhow!("terminal went away"))
        }
    }

    #[tokio::test]
    async fn test_input_error_still_closes_gateway() {
        let calls = Arc::new(Calls::default());
        let gateway = Gateway::new(
            SessionConfig::new("localhost:2001", 7, false),
            FakeSpaces::new(calls.clone(), &[]),
        );

        let result = Repl::new(gateway, BrokenInput, io::sink()).run().await;

        assert!(result.is_err());
        assert_eq!(calls.shutdowns(), 1);
    }

    #[test]
    fn test_format_state() {
        assert_eq!(format_state(&[]), "[]");
        assert_eq!(format_state(&["<a>".to_string()]), "[<a>]");
        assert_eq!(
            format_state(&["<a>".to_string(), "<b,c>".to_string()]),
            "[<a>, <b,c>]"
        );
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn test_any_delimited_put_issues_exactly_that_call(body in "[^\\s]{0,16}") {
            let calls = Arc::new(Calls::default());
            let line = format!("put <{}>", body);
            let (result, out) = block_on(session(
                FakeSpaces::new(calls.clone(), &[]),
                &format!("{}\n", line),
            ));

            prop_assert!(result.is_ok());
            prop_assert_eq!(out, "OK\n\n");
            prop_assert_eq!(calls.log(), vec![line]);
        }

        #[test]
        fn test_undelimited_tuple_prints_usage_without_calls(
            name in prop::sample::select(vec!["put", "read", "take"]),
            token in "[^\\s]{1,16}".prop_filter("not a tuple literal", |t| !grammar::is_tuple_literal(t)),
        ) {
            let calls = Arc::new(Calls::default());
            let (result, out) = block_on(session(
                FakeSpaces::new(calls.clone(), &[]),
                &format!("{} {}\n", name, token),
            ));

            prop_assert!(result.is_ok());
            prop_assert_eq!(out, usage_block());
            prop_assert!(calls.log().is_empty());
            prop_assert_eq!(calls.shutdowns(), 1);
        }
    }
}
