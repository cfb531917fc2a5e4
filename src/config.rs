use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How chunks reach the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// Workers pull chunks from a shared queue until it drains.
    #[default]
    Pull,
    /// Chunks are handed out up front on a rayon pool.
    Push,
}

impl FromStr for Dispatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pull" => Ok(Dispatch::Pull),
            "push" => Ok(Dispatch::Push),
            other => Err(format!("unknown dispatch mode {other:?}, expected pull or push")),
        }
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dispatch::Pull => "pull",
            Dispatch::Push => "push",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub workers: NonZeroUsize,
    /// Target chunk size in bytes; `None` splits the input once per worker.
    pub chunk_size: Option<NonZeroUsize>,
    pub dispatch: Dispatch,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workers: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            chunk_size: None,
            dispatch: Dispatch::default(),
        }
    }
}

impl Config {
    pub fn workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    pub fn chunk_size(mut self, chunk_size: Option<NonZeroUsize>) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }
}
