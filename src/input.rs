//! Sources of interactive input.
//!
//! The sync pipeline never reads the terminal directly. It asks an
//! [`InputProvider`] for each value, so the same run can be driven by a user at
//! a prompt, by command-line flags or by a canned script.

use std::{
    collections::{HashMap, VecDeque},
    io::{self, BufRead, Write},
};

use crate::{Error, Res};

/// The values a run may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prompt {
    Username,
    FolderId,
    PlaylistName,
    RedirectUrl,
}

impl Prompt {
    pub fn label(&self) -> &'static str {
        match self {
            Prompt::Username => "Discogs username",
            Prompt::FolderId => "Discogs collection id",
            Prompt::PlaylistName => "playlist name",
            Prompt::RedirectUrl => "redirect URL",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            Prompt::Username => "Enter your Discogs username: ",
            Prompt::FolderId => "Enter the ID of the Discogs collection to scrape: ",
            Prompt::PlaylistName => "Enter the name of the Spotify playlist [Discogs Collection]: ",
            Prompt::RedirectUrl => "Enter the URL you were redirected to: ",
        }
    }
}

pub trait InputProvider {
    /// Returns the answer to `prompt`, trimmed of surrounding whitespace.
    fn ask(&mut self, prompt: Prompt) -> Res<String>;
}

impl<T: InputProvider + ?Sized> InputProvider for &mut T {
    fn ask(&mut self, prompt: Prompt) -> Res<String> {
        (**self).ask(prompt)
    }
}

/// Reads answers line by line from a reader, stdin by default.
pub struct ConsoleInput<R> {
    reader: R,
}

impl ConsoleInput<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            reader: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputProvider for ConsoleInput<R> {
    fn ask(&mut self, prompt: Prompt) -> Res<String> {
        print!("{}", prompt.question());
        io::stdout().flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(Error::Input(format!(
                "input closed before {} was given",
                prompt.label()
            )));
        }

        Ok(line.trim().to_string())
    }
}

/// Answers known prompts from preset values and defers the rest.
pub struct PresetInput<F> {
    presets: HashMap<Prompt, String>,
    fallback: F,
}

impl<F: InputProvider> PresetInput<F> {
    pub fn new(fallback: F) -> Self {
        Self {
            presets: HashMap::new(),
            fallback,
        }
    }

    pub fn with(mut self, prompt: Prompt, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.presets.insert(prompt, value);
        }
        self
    }
}

impl<F: InputProvider> InputProvider for PresetInput<F> {
    fn ask(&mut self, prompt: Prompt) -> Res<String> {
        match self.presets.get(&prompt) {
            Some(value) => Ok(value.trim().to_string()),
            None => self.fallback.ask(prompt),
        }
    }
}

/// Answers prompts from a fixed script, for headless runs.
///
/// Each prompt has its own queue of answers; asking for a prompt whose queue
/// is empty is an error.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: HashMap<Prompt, VecDeque<String>>,
    asked: Vec<Prompt>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, prompt: Prompt, value: impl Into<String>) -> Self {
        self.answers
            .entry(prompt)
            .or_default()
            .push_back(value.into());
        self
    }

    /// Prompts asked so far, in order.
    pub fn asked(&self) -> &[Prompt] {
        &self.asked
    }
}

impl InputProvider for ScriptedInput {
    fn ask(&mut self, prompt: Prompt) -> Res<String> {
        self.asked.push(prompt);
        self.answers
            .get_mut(&prompt)
            .and_then(|queue| queue.pop_front())
            .map(|value| value.trim().to_string())
            .ok_or_else(|| Error::Input(format!("no scripted answer for {}", prompt.label())))
    }
}
