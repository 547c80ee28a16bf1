use siwe_codec::{Address, ChainId, Domain, Message, Nonce, Statement, Timestamp, Uri};

fn main() {
    let mut message = Message::new(
        Domain::parse("example.com").expect("valid domain"),
        Address::parse("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").expect("valid address"),
        Uri::parse("https://example.com/login").expect("valid uri"),
        ChainId::from(1),
        Nonce::generate(),
        Timestamp::now(),
    );
    message.statement = Some(Statement::parse("Sign in to Example.").expect("valid statement"));

    let text = message.to_text();
    match Message::parse(&text) {
        Ok(parsed) if parsed == message => {
            println!("{}", text);
            println!();
            println!("eip191 digest: 0x{}", hex::encode(message.eip191_hash()));
        }
        Ok(_) => {
            eprintln!("round trip changed the message");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("generated message did not parse: {}", err);
            std::process::exit(1);
        }
    }
}
