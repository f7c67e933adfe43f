use httpfs::http::parser::{
    ParseError, RequestDecoder, parse_http_request, parse_http_request_with_limit,
};
use httpfs::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.body.is_empty());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /notes/a.txt HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/notes/a.txt");
    assert_eq!(parsed.version, "HTTP/1.0");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_ignores_bytes_past_content_length() {
    let req = b"POST /a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"abc".to_vec());
    assert_eq!(consumed, req.len() - 3);
}

#[test]
fn test_parse_content_length_case_insensitive() {
    let req = b"POST /a HTTP/1.1\r\ncontent-length: 2\r\n\r\nhi";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"hi".to_vec());
}

#[test]
fn test_parse_non_numeric_content_length_means_empty_body() {
    let req = b"POST /a HTTP/1.1\r\nContent-Length: lots\r\n\r\nignored";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert!(parsed.body.is_empty());
    assert_eq!(consumed, req.len() - b"ignored".len());
}

#[test]
fn test_parse_duplicate_headers_last_wins() {
    let req = b"GET / HTTP/1.1\r\nX-Tag: first\r\nX-Tag: second\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("X-Tag").unwrap(), "second");
}

#[test]
fn test_parse_header_split_on_first_separator() {
    let req = b"GET / HTTP/1.1\r\nX-Time: 10: 30\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("X-Time").unwrap(), "10: 30");
}

#[test]
fn test_parse_header_without_separator_is_ignored() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: h\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.headers.get("Host").unwrap(), "h");
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_terminator_split_across_reads() {
    let full = b"GET /split HTTP/1.1\r\nHost: h\r\n\r\n";
    let mut buffer = Vec::new();

    // Feed the request one byte at a time, as a slow client would.
    for (i, byte) in full.iter().enumerate() {
        buffer.push(*byte);
        let result = parse_http_request(&buffer);
        if i + 1 < full.len() {
            assert!(matches!(result, Err(ParseError::Incomplete)), "byte {i}");
        } else {
            let (parsed, consumed) = result.unwrap();
            assert_eq!(parsed.path, "/split");
            assert_eq!(consumed, full.len());
        }
    }
}

#[test]
fn test_parse_unsupported_http_method() {
    for verb in ["DELETE", "PUT", "HEAD", "PATCH"] {
        let req = format!("{verb} /x HTTP/1.1\r\n\r\n");
        let result = parse_http_request(req.as_bytes());

        assert_eq!(result.unwrap_err(), ParseError::UnsupportedMethod(verb.to_string()));
    }
}

#[test]
fn test_parse_lowercase_method_is_unsupported() {
    let result = parse_http_request(b"get / HTTP/1.1\r\n\r\n");

    assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
}

#[test]
fn test_parse_malformed_request_lines() {
    let cases: [&[u8]; 6] = [
        b"GET /\r\n\r\n",
        b"GET / HTTP/1.1 extra\r\n\r\n",
        b"GET / FTP/1.1\r\n\r\n",
        b"GET / HTTP/1.\r\n\r\n",
        b"GET  HTTP/1.1\r\n\r\n",
        b"\r\n\r\n",
    ];

    for case in cases {
        let result = parse_http_request(case);
        assert_eq!(
            result.unwrap_err(),
            ParseError::Malformed,
            "{}",
            String::from_utf8_lossy(case)
        );
    }
}

#[test]
fn test_parse_http_version_without_minor() {
    let (parsed, _) = parse_http_request(b"GET / HTTP/2\r\n\r\n").unwrap();

    assert_eq!(parsed.version, "HTTP/2");
}

#[test]
fn test_parse_path_with_space_and_query() {
    let (parsed, _) = parse_http_request(b"GET /my file.txt?x=1 HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.path, "/my file.txt?x=1");
}

#[test]
fn test_parse_invalid_utf8_headers() {
    let result = parse_http_request(b"GET /\xff HTTP/1.1\r\n\r\n");

    assert_eq!(result.unwrap_err(), ParseError::InvalidEncoding);
}

#[test]
fn test_parse_headers_too_large() {
    let mut req = b"GET / HTTP/1.1\r\nX-Pad: ".to_vec();
    req.extend(std::iter::repeat_n(b'a', 200));

    let result = parse_http_request_with_limit(&req, 128);
    assert_eq!(result.unwrap_err(), ParseError::HeadersTooLarge(128));

    // The same prefix under a roomier limit is just incomplete.
    let result = parse_http_request_with_limit(&req, 4096);
    assert_eq!(result.unwrap_err(), ParseError::Incomplete);
}

#[test]
fn test_parse_request_with_binary_body() {
    let req = b"POST /upload.bin HTTP/1.1\r\nContent-Length: 6\r\n\r\n\x00\x01\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, vec![0, 1, b'\r', b'\n', b'\r', b'\n']);
}

#[test]
fn test_parse_request_with_empty_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body.len(), 0);
}

#[test]
fn test_decoder_resumes_scan_across_reads() {
    let full = b"POST /drip.txt HTTP/1.1\r\nContent-Length: 4\r\n\r\nbody";
    let mut decoder = RequestDecoder::default();
    let mut buffer = Vec::new();
    let mut decoded = None;

    for chunk in full.chunks(2) {
        buffer.extend_from_slice(chunk);
        match decoder.decode(&buffer) {
            Ok(result) => decoded = Some(result),
            Err(ParseError::Incomplete) => assert_eq!(decoder.scanned(), buffer.len()),
            Err(e) => panic!("unexpected error {e}"),
        }
    }

    let (request, consumed) = decoded.expect("request decoded once complete");
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.body, b"body".to_vec());
    assert_eq!(consumed, full.len());
}

#[test]
fn test_decoder_enforces_header_limit_incrementally() {
    let mut decoder = RequestDecoder::new(32);
    let mut buffer = b"GET / HTTP/1.1\r\n".to_vec();

    assert_eq!(decoder.decode(&buffer).unwrap_err(), ParseError::Incomplete);

    buffer.extend_from_slice(b"X-Pad: aaaaaaaaaaaaaaaaaaaaaaaa");
    assert_eq!(decoder.decode(&buffer).unwrap_err(), ParseError::HeadersTooLarge(32));
}
