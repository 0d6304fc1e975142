//! Operator metadata collection
//!
//! The building name is asked for once per run and the device name once per
//! device group. Answers come from a [`Prompter`], so batch harnesses and
//! tests can supply canned answers instead of reading the console.

use crate::constants::BUILDING_PROMPT;
use crate::error::{Error, Result};
use crate::models::{DeviceGroup, RunMetadata};
use colored::*;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Source of free-text answers to operator prompts
pub trait Prompter {
    /// Ask one question and return the raw answer
    fn prompt(&mut self, label: &str) -> Result<String>;
}

/// Prompter reading answers line by line from a reader, typically stdin
#[derive(Debug)]
pub struct ConsolePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.writer, "{} ", format!("{}:", label).bright_white().bold())?;
        self.writer.flush()?;

        let mut input = String::new();
        let read = self.reader.read_line(&mut input)?;
        if read == 0 {
            return Err(Error::prompt_unavailable(label));
        }

        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Prompter returning a fixed sequence of answers
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Labels of every prompt asked so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, label: &str) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::prompt_unavailable(label))
    }
}

/// Collects building and device names through a prompter
pub struct MetadataCollector<'a, P: Prompter + ?Sized> {
    prompter: &'a mut P,
}

impl<'a, P: Prompter + ?Sized> MetadataCollector<'a, P> {
    pub fn new(prompter: &'a mut P) -> Self {
        Self { prompter }
    }

    /// Ask for the building name that applies to every output file
    pub fn collect_building(&mut self) -> Result<RunMetadata> {
        let building = self.ask_non_empty(BUILDING_PROMPT, "Building name")?;
        debug!("Building: {}", building);
        Ok(RunMetadata::new(building))
    }

    /// Device name for a group, asking only the first time its number is seen
    pub fn device_name(
        &mut self,
        metadata: &mut RunMetadata,
        group: &DeviceGroup,
    ) -> Result<String> {
        if let Some(name) = metadata.device_name(&group.device_number) {
            return Ok(name.to_string());
        }

        let label = device_prompt_label(group);
        let name = self.ask_non_empty(&label, "Device Name")?;
        metadata
            .device_names
            .insert(group.device_number.clone(), name.clone());
        Ok(name)
    }

    fn ask_non_empty(&mut self, label: &str, what: &str) -> Result<String> {
        loop {
            let answer = self.prompter.prompt(label)?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            warn!("{} cannot be empty. Please enter a value.", what);
        }
    }
}

fn device_prompt_label(group: &DeviceGroup) -> String {
    let sources: Vec<String> = group
        .sources
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();

    if sources.is_empty() {
        format!("Enter Device Name for {}", group.device_number)
    } else {
        format!(
            "Enter Device Name for {} (source: {})",
            group.device_number,
            sources.join(", ")
        )
    }
}
