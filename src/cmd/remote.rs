// Copyright 2025 The studylight Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::BufRead;
use std::io::Write;
use std::time::Instant;

use studylight_core::catalog::content;
use studylight_core::error::ErrorReport;
use studylight_core::error::Fallible;
use studylight_core::error::fail;
use studylight_core::services::contract::CHAT_GREETING;
use studylight_core::services::contract::ChatReply;
use studylight_core::services::contract::Conversation;
use studylight_core::services::contract::PerformanceAnalysis;
use studylight_core::services::contract::QuestionsRequest;
use studylight_core::services::contract::Quiz;
use studylight_core::services::contract::Recommendation;
use studylight_core::services::gateway::GatewayClient;
use studylight_core::store::ProfileStore;
use studylight_core::types::activity::CompletedActivity;

pub async fn recommend(gateway: &GatewayClient, store: &ProfileStore) -> Fallible<()> {
    let recommendation = gateway.recommend(store.profile(), store.history()).await?;
    print_recommendation(&recommendation, &mut std::io::stdout())
}

fn print_recommendation(r: &Recommendation, out: &mut impl Write) -> Fallible<()> {
    writeln!(out, "{}", r.title)?;
    writeln!(
        out,
        "{} / {} / {} / {} min",
        r.topic,
        r.format.label(),
        r.difficulty.label(),
        r.duration
    )?;
    writeln!(out)?;
    writeln!(out, "{}", r.reason)?;
    for adaptation in &r.adaptations {
        writeln!(out, "  - {adaptation}")?;
    }
    Ok(())
}

pub async fn analyze(gateway: &GatewayClient, store: &ProfileStore) -> Fallible<()> {
    let analysis = gateway.analyze(store.profile(), store.history()).await?;
    print_analysis(&analysis, &mut std::io::stdout())
}

fn print_analysis(a: &PerformanceAnalysis, out: &mut impl Write) -> Fallible<()> {
    writeln!(out, "Overall score: {}", a.overall_score)?;
    let sections = [
        ("Insights", &a.insights),
        ("Strengths", &a.strengths),
        ("To improve", &a.improvements),
    ];
    for (heading, items) in sections {
        if items.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{heading}:")?;
        for item in items.iter() {
            writeln!(out, "  - {item}")?;
        }
    }
    if let Some(recommendation) = &a.recommendation {
        writeln!(out)?;
        writeln!(out, "{recommendation}")?;
    }
    Ok(())
}

/// Fetch a quiz for a library item, ask it on the terminal, and record the
/// result.
pub async fn quiz(gateway: &GatewayClient, store: &mut ProfileStore, content_id: &str) -> Fallible<()> {
    let item = content::by_id(content_id)
        .ok_or_else(|| ErrorReport::new(format!("no content with id {content_id}.")))?;
    let request = QuestionsRequest {
        topic: item.topic.to_string(),
        difficulty: item.difficulty,
        title: item.title.to_string(),
    };
    let quiz = gateway.generate_questions(&request).await?;
    let started = Instant::now();
    let stdin = std::io::stdin();
    let answers = ask(&quiz, &mut stdin.lock(), &mut std::io::stdout())?;
    let score = quiz.score(&answers);
    let minutes = started.elapsed().as_secs().div_ceil(60) as u32;
    println!("You scored {score}%.");
    store.add_activity(CompletedActivity {
        title: item.title.to_string(),
        topic: item.topic.to_string(),
        format: item.format,
        difficulty: item.difficulty,
        score,
        time_spent: minutes,
    })?;
    Ok(())
}

/// Ask every question, returning the zero-based answers.
fn ask(quiz: &Quiz, input: &mut impl BufRead, out: &mut impl Write) -> Fallible<Vec<usize>> {
    let mut answers = Vec::with_capacity(quiz.questions.len());
    let mut line = String::new();
    for (n, question) in quiz.questions.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "{}. {}", n + 1, question.question)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "   {}) {option}", i + 1)?;
        }
        loop {
            write!(out, "Answer: ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return fail("quiz aborted.");
            }
            match line.trim().parse::<usize>() {
                Ok(k) if (1..=question.options.len()).contains(&k) => {
                    answers.push(k - 1);
                    break;
                }
                _ => writeln!(out, "Enter a number between 1 and {}.", question.options.len())?,
            }
        }
    }
    Ok(answers)
}

/// Talk to the tutor until the input ends or the user types `quit`.
pub async fn chat(gateway: &GatewayClient, store: &ProfileStore) -> Fallible<()> {
    let mut conversation = Conversation::new();
    println!("{CHAT_GREETING}");
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let message = line.trim();
        if message == "quit" {
            return Ok(());
        }
        if message.is_empty() {
            continue;
        }
        let request = conversation.request(message, store.profile());
        match gateway.chat(&request).await {
            Ok(reply) => {
                print_reply(&reply, &mut std::io::stdout())?;
                conversation.record(message, &reply);
            }
            Err(e) => println!("{}", e.user_message()),
        }
    }
}

fn print_reply(reply: &ChatReply, out: &mut impl Write) -> Fallible<()> {
    writeln!(out, "{}", reply.reply_text)?;
    if !reply.suggestions.is_empty() {
        writeln!(out, "Try asking: {}", reply.suggestions.join(" | "))?;
    }
    if !reply.related_topics.is_empty() {
        writeln!(out, "Related: {}", reply.related_topics.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use studylight_core::services::contract::Question;

    use super::*;

    fn question(correct_answer: usize) -> Question {
        Question {
            question: "What is 2 + 2?".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "22".into()],
            correct_answer,
        }
    }

    #[test]
    fn test_ask() -> Fallible<()> {
        let quiz = Quiz {
            questions: vec![question(1), question(1), question(0)],
        };
        // Out of range and garbage answers are asked again.
        let mut input = Cursor::new("2\n7\nfour\n2\n4\n");
        let mut out = Vec::new();
        let answers = ask(&quiz, &mut input, &mut out)?;
        assert_eq!(answers, vec![1, 1, 3]);
        assert_eq!(quiz.score(&answers), 67);
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("Enter a number between 1 and 4.").count(), 2);
        Ok(())
    }

    #[test]
    fn test_ask_aborts_on_eof() {
        let quiz = Quiz {
            questions: vec![question(0), question(0)],
        };
        let result = ask(&quiz, &mut Cursor::new("1\n"), &mut Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_print_analysis_skips_empty_sections() -> Fallible<()> {
        let mut out = Vec::new();
        print_analysis(&PerformanceAnalysis::placeholder(), &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("Overall score: 0\n"));
        assert!(text.contains("Insights:"));
        assert!(!text.contains("Strengths:"));
        Ok(())
    }

    #[test]
    fn test_print_reply() -> Fallible<()> {
        let reply = ChatReply {
            reply_text: "A loop repeats code.".to_string(),
            suggestions: vec!["What is a for loop?".to_string()],
            related_topics: Vec::new(),
        };
        let mut out = Vec::new();
        print_reply(&reply, &mut out)?;
        assert_eq!(
            String::from_utf8_lossy(&out),
            "A loop repeats code.\nTry asking: What is a for loop?\n"
        );
        Ok(())
    }
}
