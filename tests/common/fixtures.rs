//! Canned access-log text for the harnesses.
//!
//! Lines are copied from a real public-facing server: scanners, TLS
//! handshakes sent to port 80 and a stratum miner, next to ordinary traffic.

#![allow(dead_code)]

/// Ten lines from one evening, each with all three trailing fields.
pub const EVENING_DUMP: &str = r#"80.94.92.239 - - [19/Sep/2022:18:25:50 +0000] "GET / HTTP/1.1" 404 555 "-" "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.85 Safari/537.36 Edg/90.0.818.46" "-"
216.244.66.203 - - [19/Sep/2022:18:43:20 +0000] "GET /robots.txt HTTP/1.1" 301 169 "-" "Mozilla/5.0 (compatible; DotBot/1.2; +https://opensiteexplorer.org/dotbot; help@moz.com)" "-"
159.89.170.59 - - [19/Sep/2022:18:52:55 +0000] "\x89%\xC3\xBAxgx\x90\x15H\xF4n7\xD4\x9Cm" 400 157 "-" "-" "-"
159.89.170.59 - - [19/Sep/2022:18:52:57 +0000] "\x16\x03\x01\x00{\x01\x00\x00w\x03\x03\xEB\x04\xFC\x10\xFA\x8B\x89\x1F\xC0\x13\xE4\x1E\x0F\xDD\xD7\xE8\xD9\xE0p\xE3\x92\xFF8\xA6\xBE}\x03X\xBAg\x12L\x00\x00\x1A\xC0/\xC0+\xC0\x11\xC0\x07\xC0\x13\xC0\x09\xC0\x14\xC0" 400 157 "-" "-" "-"
159.89.170.59 - - [19/Sep/2022:18:52:57 +0000] "\x16\x03\x01\x00{\x01\x00\x00w\x03\x03\x8B\xD0\xEF\xC6\xBEo+\xEF" 400 157 "-" "-" "-"
159.89.170.59 - - [19/Sep/2022:18:52:57 +0000] "GET / HTTP/1.1" 404 153 "-" "Mozilla/5.0 zgrab/0.x" "-"
152.89.196.211 - - [19/Sep/2022:19:31:42 +0000] "GET /actuator/gateway/routes HTTP/1.1" 404 555 "-" "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/78.0.3904.108 Safari/537.36" "-"
44.44.44.44 - - [19/Sep/2022:20:06:47 +0000] "\x16\x03\x01\x02\x00\x01\x00\x01\xFC\x03\x03d+\xB6\xDE\x8D\x10\xDD5@1\xE3\x8ET\xFD\x10\xE8\xF5>x\xBF\x7F\x7F\xFE\x16" 400 157 "-" "-" "-"
103.131.71.96 - - [19/Sep/2022:20:08:09 +0000] "GET /robots.txt HTTP/1.1" 301 169 "-" "Mozilla/5.0 (compatible; coccocbot-web/1.0; +http://help.coccoc.com/searchengine)" "-"
44.44.44.44 - - [19/Sep/2022:20:14:38 +0000] "YOYO\x22 DA RUAN\x22 YANKA" 400 157 "-" "-" "-""#;

/// Miner login attempts sent to the HTTP port.
pub const MINER_DUMP: &str = r#"106.75.176.0 - - [10/Sep/2022:18:33:10 +0000] "{\x22params\x22: [\x22miner1\x22, \x22password\x22], \x22id\x22: 2, \x22method\x22: \x22mining.authorize\x22}" 400 157 "-" "-"
45.148.120.0 - - [14/Sep/2022:21:17:25 +0000] "{\x22id\x22: 1, \x22method\x22: \x22mining.subscribe\x22, \x22params\x22: [\x22cpuminer/2.5.1\x22]}" 400 157 "-" "-""#;

/// Lines that are not access-log lines at all.
pub const FOREIGN_LINES: &[&str] = &[
    "",
    "nginx: [warn] conflicting server name \"_\" on 0.0.0.0:80, ignored",
    "2022/09/19 08:01:21 [error] 7#7: *1 open() failed",
    "999.1.1.1 - - [19/Sep/2022:08:01:21 +0000] \"GET / HTTP/1.1\" 200 1 \"-\" \"-\" \"-\"",
    "1.2.3.4 - - [19/Sep/2022:08:01:21+0000] \"GET / HTTP/1.1\" 200 1 \"-\" \"-\" \"-\"",
];

/// A well-formed line with the given address, time, request and status.
pub fn line(ip: &str, time: &str, request: &str, status: i64) -> String {
    format!("{ip} - - [{time}] \"{request}\" {status} 100 \"-\" \"curl/8.0\" \"-\"")
}

/// Join lines into a dump.
pub fn dump<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}
