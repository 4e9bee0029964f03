use bytes::BytesMut;
use nom::bytes::complete::take_till;
use nom::character::complete::char;
use nom::sequence::separated_pair;
use nom::IResult;
use tokio_util::codec::Decoder;

use crate::error::ConnectionError;

pub const LF: u8 = b'\n';
pub const DEFAULT_MAX_REQUEST_LINE: usize = 1024;

#[derive(Debug, PartialEq)]
pub struct Request {
    pub verb: String,
    pub path: String,
}

impl Request {
    pub fn new(verb: &str, path: &str) -> Self {
        Self {
            verb: verb.to_string(),
            path: path.to_string(),
        }
    }

    /// Parses `VERB SP PATH`, ignoring anything after a further space.
    pub fn from_line(line: &str) -> Result<Self, ConnectionError> {
        let (_, (verb, path)) =
            verb_and_path(line).map_err(|_| ConnectionError::BadRequest(line.to_string()))?;
        Ok(Self::new(verb, path))
    }
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == ' ')(input)
}

fn verb_and_path(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(token, char(' '), token)(input)
}

/// Frames the single request line of a connection. The first read must hold
/// the whole line, line feed included, within `max_length` bytes.
#[derive(Debug, Clone)]
pub struct RequestLineCodec {
    max_length: usize,
}

impl RequestLineCodec {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for RequestLineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUEST_LINE)
    }
}

impl Decoder for RequestLineCodec {
    type Item = String;
    type Error = ConnectionError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ConnectionError> {
        let window = src.len().min(self.max_length);
        if let Some(pos) = src[..window].iter().position(|b| *b == LF) {
            let line = src.split_to(pos + 1);
            let mut end = pos;
            if end > 0 && line[end - 1] == b'\r' {
                end -= 1;
            }
            return Ok(Some(String::from_utf8_lossy(&line[..end]).into_owned()));
        }
        if src.is_empty() {
            return Ok(None);
        }
        if src.len() >= self.max_length {
            return Err(ConnectionError::RequestLineTooLong(self.max_length));
        }
        Err(ConnectionError::MissingLineFeed)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ConnectionError> {
        self.decode(src)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_from_line() {
        let request = Request::from_line("GET /index.html").unwrap();
        assert_eq!(request, Request::new("GET", "/index.html"));

        let request = Request::from_line("GET /a.txt HTTP/1.0 trailing").unwrap();
        assert_eq!(request, Request::new("GET", "/a.txt"));

        let request = Request::from_line("POST /").unwrap();
        assert_eq!(request, Request::new("POST", "/"));
    }

    #[test]
    fn test_request_splits_on_single_spaces() {
        let request = Request::from_line("GET  /x").unwrap();
        assert_eq!(request, Request::new("GET", ""));

        let request = Request::from_line("GET ").unwrap();
        assert_eq!(request, Request::new("GET", ""));
    }

    #[test]
    fn test_request_needs_two_tokens() {
        assert!(matches!(
            Request::from_line("GET"),
            Err(ConnectionError::BadRequest(line)) if line == "GET"
        ));
        assert!(matches!(
            Request::from_line(""),
            Err(ConnectionError::BadRequest(_))
        ));
    }

    #[test]
    fn test_codec_decodes_line() {
        let mut codec = RequestLineCodec::default();
        let mut buf = BytesMut::from("GET /index.html\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("GET /index.html".to_string())
        );
        assert!(buf.is_empty());

        let mut buf = BytesMut::from("GET /crlf\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("GET /crlf".to_string()));
    }

    #[test]
    fn test_codec_rejects_unterminated_read() {
        let mut codec = RequestLineCodec::default();
        let mut buf = BytesMut::from("GET /par");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ConnectionError::MissingLineFeed)
        ));

        let mut buf = BytesMut::from("GET /x");
        assert!(matches!(
            codec.decode_eof(&mut buf),
            Err(ConnectionError::MissingLineFeed)
        ));
    }

    #[test]
    fn test_codec_empty_buffer() {
        let mut codec = RequestLineCodec::default();
        let mut buf = BytesMut::new();
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(matches!(codec.decode_eof(&mut buf), Ok(None)));
    }

    #[test]
    fn test_codec_limits_line_length() {
        let mut codec = RequestLineCodec::new(8);
        let mut buf = BytesMut::from("GET /abc\n");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ConnectionError::RequestLineTooLong(8))
        ));

        let mut buf = BytesMut::from("GET /ab\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("GET /ab".to_string()));
    }
}
