//! Fetches a URL given on the command line and prints the response
//! status, headers, and body — a runnable sanity check for [`transit::Client`].
use std::io::Read;

use transit::method::Method;
use transit::target::Target;
use transit::{Client, Request};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let url = std::env::args().nth(1).unwrap_or_else(|| "http://example.com/".to_owned());
    let target = Target::parse(&url)?;
    let request = Request::new(Method::GET, target);

    let client = Client::new();
    client.send(request, |response, body| {
        println!("{} {}", response.status().as_u16(), response.reason());
        for (name, value) in response.headers() {
            println!("{name}: {}", value.to_str().unwrap_or("<binary>"));
        }
        println!();
        let mut out = String::new();
        body.read_to_string(&mut out).ok();
        println!("{out}");
    })?;

    Ok(())
}
