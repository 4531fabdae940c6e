use ksgen::{Keystore, Network};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let password = "secure_password_123";

    for network in Network::ALL {
        println!("Creating new {network} keystore...");

        let keystore = Keystore::new(network, password)?;
        println!("Generated {network} address: {}", keystore.address());

        let json = keystore.to_json()?;
        let loaded = Keystore::from_json(&json)?;
        loaded.decrypt_key(password)?;
        println!("Decrypted key matches {}", loaded.address());
    }

    let keystore = Keystore::new(Network::Ethereum, password)?;
    println!("{}", keystore.to_json()?);

    Ok(())
}
