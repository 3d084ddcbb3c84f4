use std::io::BufRead;

use serde::Deserialize;
use sim_types::SimError;

use super::delta::OrderBookDelta;

/// A single level point in a JSONL replay row; accepted as either a
/// `[price, size]` tuple or a `{"price":..,"size":..}` object (spec §6).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LevelPoint {
    Tuple((f64, f64)),
    Object { price: f64, size: f64 },
}

impl From<LevelPoint> for (f64, f64) {
    fn from(point: LevelPoint) -> Self {
        match point {
            LevelPoint::Tuple((price, size)) => (price, size),
            LevelPoint::Object { price, size } => (price, size),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonlRow {
    symbol: String,
    #[serde(default)]
    bid_updates: Vec<LevelPoint>,
    #[serde(default)]
    ask_updates: Vec<LevelPoint>,
}

/// Reads one [`OrderBookDelta`] per non-blank line of a reader over JSONL
/// replay data (spec §4.5, §6). Malformed lines fail with a parse error
/// citing the 1-indexed line number; blank lines are skipped without
/// consuming a delta.
#[derive(Debug)]
pub struct JsonlReplayDataSource<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> JsonlReplayDataSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonlReplayDataSource<R> {
    type Item = Result<OrderBookDelta, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            self.line_no += 1;
            let line = match raw {
                Ok(line) => line,
                Err(err) => return Some(Err(SimError::Io(err))),
            };
            if line.trim().is_empty() {
                continue;
            }
            let row: JsonlRow = match serde_json::from_str(&line) {
                Ok(row) => row,
                Err(err) => {
                    return Some(Err(SimError::MalformedReplayRow {
                        line: self.line_no,
                        message: err.to_string(),
                    }))
                }
            };
            return Some(Ok(OrderBookDelta {
                symbol: row.symbol,
                bid_updates: row.bid_updates.into_iter().map(Into::into).collect(),
                ask_updates: row.ask_updates.into_iter().map(Into::into).collect(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_tuple_and_object_rows() {
        let data = concat!(
            "{\"symbol\":\"BTC-USD\",\"bid_updates\":[[100.0,1.0]],\"ask_updates\":[{\"price\":101.0,\"size\":2.0}]}\n",
            "\n",
            "{\"symbol\":\"BTC-USD\",\"bid_updates\":[],\"ask_updates\":[]}\n",
        );
        let mut source = JsonlReplayDataSource::new(Cursor::new(data));
        let first = source.next().unwrap().unwrap();
        assert_eq!(first.bid_updates, vec![(100.0, 1.0)]);
        assert_eq!(first.ask_updates, vec![(101.0, 2.0)]);
        let second = source.next().unwrap().unwrap();
        assert!(second.bid_updates.is_empty());
        assert!(source.next().is_none());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let data = "{\"symbol\":\"BTC-USD\",\"bid_updates\":[[100.0,1.0]]}\nnot json\n";
        let mut source = JsonlReplayDataSource::new(Cursor::new(data));
        assert!(source.next().unwrap().is_ok());
        match source.next().unwrap() {
            Err(SimError::MalformedReplayRow { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed row error, got {other:?}"),
        }
    }
}
