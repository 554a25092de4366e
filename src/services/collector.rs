use std::io::{BufRead, ErrorKind, Write};

use crate::{
    error::{AppError, AppResult},
    models::{Rating, RecommendationItem},
};

/// Token that leaves an item unrated
pub const SKIP_TOKEN: &str = "skip";

/// What the viewer answered for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingResponse {
    Rated(Rating),
    Skipped,
}

impl RatingResponse {
    /// Interprets one line of input, or `None` if it is not an accepted token
    pub fn parse(input: &str) -> Option<Self> {
        let token = input.trim();
        if token.eq_ignore_ascii_case(SKIP_TOKEN) {
            return Some(RatingResponse::Skipped);
        }
        token.parse::<Rating>().ok().map(RatingResponse::Rated)
    }

    fn into_rating(self) -> Option<Rating> {
        match self {
            RatingResponse::Rated(rating) => Some(rating),
            RatingResponse::Skipped => None,
        }
    }
}

/// Asks the viewer for their real reaction to each recommendation
///
/// Items are visited strictly in list order. Unrecognised answers re-prompt
/// the same item with no retry limit.
pub struct RatingCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> RatingCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Attaches an `actual_rating` to every item, `None` for skipped ones
    pub fn collect(&mut self, items: &mut [RecommendationItem]) -> AppResult<()> {
        writeln!(self.output, "\n=== Rate each recommendation ===")?;
        writeln!(
            self.output,
            "Options: {} / {}\n",
            rating_names().join(" / "),
            SKIP_TOKEN
        )?;

        for (i, item) in items.iter_mut().enumerate() {
            writeln!(self.output, "[{}] {}", i + 1, item.title)?;
            writeln!(self.output, "    Predicted: {}", item.predicted_rating)?;
            writeln!(
                self.output,
                "    Reasoning: {}",
                item.reasoning.as_deref().unwrap_or("N/A")
            )?;

            let response = self.prompt_until_valid()?;
            item.actual_rating = response.into_rating();

            tracing::debug!(
                title = %item.title,
                actual = ?item.actual_rating,
                "Rating recorded"
            );
            writeln!(self.output)?;
        }

        Ok(())
    }

    fn prompt_until_valid(&mut self) -> AppResult<RatingResponse> {
        loop {
            write!(self.output, "    Your rating: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(AppError::Io(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "input closed before every item was rated",
                )));
            }

            if let Some(response) = RatingResponse::parse(&line) {
                return Ok(response);
            }

            writeln!(
                self.output,
                "    Invalid. Choose from: {}, {}",
                rating_names().join(", "),
                SKIP_TOKEN
            )?;
        }
    }

    /// Releases the underlying reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

fn rating_names() -> Vec<&'static str> {
    Rating::ALL.iter().map(|r| r.as_str()).collect()
}
