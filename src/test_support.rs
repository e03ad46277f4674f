//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::Oracle;
use crate::error::OracleFailure;
use crate::models::{Article, RawArticle};

pub fn article(row_id: u64, headline: &str, outlet: &str) -> Article {
    Article::from_raw(
        row_id,
        RawArticle {
            headline: headline.to_string(),
            outlet: outlet.to_string(),
            url: format!("https://n.news.naver.com/mnews/article/023/{row_id:010}"),
            ..RawArticle::default()
        },
    )
}

/// Numbered items of an enumerated prompt, in order.
pub fn enumerated_items(user_prompt: &str) -> Vec<String> {
    user_prompt
        .lines()
        .filter_map(|line| {
            let (number, rest) = line.split_once(". ")?;
            number.parse::<usize>().ok()?;
            Some(rest.to_string())
        })
        .collect()
}

type Responder = Box<dyn Fn(&str, &str) -> Result<String, OracleFailure>>;

/// An [`Oracle`] that answers from a closure or a fixed queue and records every call.
pub struct ScriptedOracle {
    responder: Responder,
    calls: RefCell<Vec<(String, String)>>,
}

impl ScriptedOracle {
    pub fn from_fn(f: impl Fn(&str, &str) -> Result<String, OracleFailure> + 'static) -> Self {
        Self {
            responder: Box::new(f),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Replies in order; once the queue is empty every call fails.
    pub fn replies(replies: Vec<&str>) -> Self {
        let queue: RefCell<VecDeque<String>> =
            RefCell::new(replies.into_iter().map(str::to_string).collect());
        Self::from_fn(move |_, _| {
            queue
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| OracleFailure::Transport("script exhausted".into()))
        })
    }

    pub fn failing() -> Self {
        Self::from_fn(|_, _| Err(OracleFailure::Transport("connection refused".into())))
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// User prompts of every call so far.
    pub fn user_prompts(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(_, user)| user.clone()).collect()
    }
}

impl Oracle for ScriptedOracle {
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleFailure> {
        self.calls
            .borrow_mut()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        (self.responder)(system_prompt, user_prompt)
    }
}
