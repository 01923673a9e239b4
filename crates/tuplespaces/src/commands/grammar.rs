//! Line grammar for the interactive prompt.
//!
//! A line is trimmed and split on single spaces; the first token selects the
//! command by exact match. Anything that does not satisfy the rules below is
//! [`Command::Invalid`] and never reaches the server.

const SPACE: char = ' ';
const BGN_TUPLE: char = '<';
const END_TUPLE: char = '>';

const PUT: &str = "put";
const READ: &str = "read";
const TAKE: &str = "take";
const GET_TUPLE_SPACES_STATE: &str = "getTupleSpacesState";
const SLEEP: &str = "sleep";
const EXIT: &str = "exit";

/// Text printed for any rejected line.
pub const USAGE: &str = "Usage:
- put <element[,more_elements]> [<delayServer1(seconds)> <...> <delayServerN(seconds)>]
- read <element[,more_elements]> [<delayServer1(seconds)> <...> <delayServerN(seconds)>]
- take <element[,more_elements]> [<delayServer1(seconds)> <...> <delayServerN(seconds)>]
- getTupleSpacesState
- sleep <delay (seconds)>
- exit
";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put(String),
    Read(String),
    Take(String),
    GetTupleSpacesState,
    /// Local pause, in whole seconds.
    Sleep(u64),
    Exit,
    Invalid,
}

/// Parse one input line.
pub fn parse(line: &str) -> Command {
    let tokens: Vec<&str> = line.trim().split(SPACE).collect();

    match tokens[0] {
        PUT => tuple_arg(&tokens).map_or(Command::Invalid, Command::Put),
        READ => tuple_arg(&tokens).map_or(Command::Invalid, Command::Read),
        TAKE => tuple_arg(&tokens).map_or(Command::Invalid, Command::Take),
        GET_TUPLE_SPACES_STATE if tokens.len() == 1 => Command::GetTupleSpacesState,
        SLEEP if tokens.len() == 2 => tokens[1]
            .parse::<u64>()
            .map_or(Command::Invalid, Command::Sleep),
        EXIT if tokens.len() == 1 => Command::Exit,
        _ => Command::Invalid,
    }
}

/// Whether `token` is delimited as a tuple literal.
pub fn is_tuple_literal(token: &str) -> bool {
    token.starts_with(BGN_TUPLE) && token.ends_with(END_TUPLE)
}

/// The single tuple argument of a `put`/`read`/`take` line.
fn tuple_arg(tokens: &[&str]) -> Option<String> {
    match tokens {
        [_, tuple] if is_tuple_literal(tuple) => Some((*tuple).to_string()),
        _ => None,
    }
}
