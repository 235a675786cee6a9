use log::{error, info};
use std::time::Instant;

use d5a::prelude::*;

#[tokio::main]
async fn main() {
    env_logger::init();

    let time = Instant::now();
    let mut device = D5a::connect::<Emulated>(D5aDevice::known("demo", 2))
        .await
        .expect("Must connect");

    let dac7 = Channel::new(7).expect("valid channel");
    device.set_span(dac7, "4v uni").await.expect("Must set span");
    device.set_dac(dac7, 1.25).await.expect("Must set voltage");

    info!(
        "dac7 = {} V, span '{}', step {} V",
        device.dac(dac7).await.expect("Must read"),
        device.span(dac7).await.expect("Must read"),
        device.stepsize(dac7).await.expect("Must read"),
    );

    if let Err(err) = device.set_span(dac7, "10v bi").await {
        error!("Rejected span change: {err:?}");
    }

    device.set_dacs_zero().await.expect("Must zero");

    match device.snapshot().await.map(|snapshot| snapshot.to_json()) {
        Ok(Ok(json)) => println!("{json}"),
        Ok(Err(err)) => error!("Could not render snapshot: {err}"),
        Err(err) => error!("Could not read snapshot: {err:?}"),
    }

    info!("Demo concluded in {}ms", time.elapsed().as_millis());
}
