// where the question comes from: a file, the command line, or stdin

use crate::Error;
use std::io::{IsTerminal, Read};
use std::path::Path;

pub fn read(words: &[String], file: Option<&Path>) -> Result<String, Error> {
    let raw = if let Some(path) = file {
        std::fs::read_to_string(path).map_err(Error::Input)?
    } else if !words.is_empty() {
        words.join(" ")
    } else {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            eprintln!("reading question from stdin (ctrl-d to send)");
        }
        read_from(stdin.lock())?
    };

    let question = raw.trim();
    if question.is_empty() {
        return Err(Error::EmptyQuestion);
    }

    Ok(question.to_string())
}

pub fn read_from(mut reader: impl Read) -> Result<String, Error> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::Input)?;
    Ok(buf)
}
