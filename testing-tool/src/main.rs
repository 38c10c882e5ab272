use anyhow::{bail, Context, Result};
use chrono::{Duration, SecondsFormat, Utc};
use colored::*;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚚 Fleet Booking Smoke Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    // Paso 1: Pedir URL del servidor
    let base_url = get_base_url()?;
    let client = Client::new();

    // Paso 2: Verificar que el servidor responde
    ping(&client, &base_url).await?;

    // Paso 3: Menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🧪 Ejecutar escenario completo");
        println!("2. 🚗 Listar vehículos");
        println!("3. 📅 Listar reservas recientes");
        println!("4. 🚪 Salir");
        print!("{}", "Selecciona una opción (1-4): ".bright_yellow());
        io::stdout().flush()?;

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;

        let outcome = match choice.trim() {
            "1" => run_scenario(&client, &base_url).await,
            "2" => show(&client, &format!("{}/api/vehicles", base_url)).await,
            "3" => show(&client, &format!("{}/api/bookings", base_url)).await,
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{}", format!("❌ {:#}", e).bright_red());
        }
    }

    Ok(())
}

fn get_base_url() -> Result<String> {
    print!("{}", "URL del servidor [http://localhost:5174]: ".bright_yellow());
    io::stdout().flush()?;
    let mut url = String::new();
    io::stdin().read_line(&mut url)?;
    let url = url.trim().trim_end_matches('/');
    Ok(if url.is_empty() {
        "http://localhost:5174".to_string()
    } else {
        url.to_string()
    })
}

async fn ping(client: &Client, base_url: &str) -> Result<()> {
    let response = client
        .get(format!("{}/api/ping", base_url))
        .send()
        .await
        .context("el servidor no responde")?;
    let body: Value = response.json().await?;
    println!("{} {}", "✅ Ping:".bright_green(), body["message"]);
    Ok(())
}

async fn show(client: &Client, url: &str) -> Result<()> {
    println!("{} {}", "📤 GET".bright_blue(), url);
    let response = client.get(url).send().await?;
    println!("{} {}", "📥 Status:".bright_blue(), response.status());
    let body: Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Enviar una petición y comprobar el status esperado
async fn expect(
    request: reqwest::RequestBuilder,
    step: &str,
    expected: StatusCode,
) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status != expected {
        println!("{}", format!("❌ {}: {} (esperado {})", step, status, expected).bright_red());
        println!("{}", serde_json::to_string_pretty(&body)?);
        bail!("paso fallido: {}", step);
    }

    println!("{}", format!("✅ {}: {}", step, status).bright_green());
    Ok(body)
}

async fn run_scenario(client: &Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "🧪 ESCENARIO: registrar, buscar, reservar".bright_cyan().bold());
    println!("{}", "===========================================".bright_cyan());

    let created = expect(
        client
            .post(format!("{}/api/vehicles", base_url))
            .json(&json!({ "name": "Tata 407", "capacityKg": 500, "tyres": 6 })),
        "Registrar vehículo",
        StatusCode::CREATED,
    )
    .await?;
    let vehicle_id = created["vehicle"]["id"]
        .as_str()
        .context("respuesta sin vehicle.id")?
        .to_string();
    println!("   🆔 {}", vehicle_id);

    let start = (Utc::now() + Duration::minutes(5)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let search = expect(
        client.get(format!("{}/api/vehicles/available", base_url)).query(&[
            ("capacityRequired", "200"),
            ("fromPincode", "474009"),
            ("toPincode", "410099"),
            ("startTime", start.as_str()),
        ]),
        "Buscar disponibilidad",
        StatusCode::OK,
    )
    .await?;
    println!(
        "   ⏱️ Duración estimada: {} h",
        search["estimatedRideDurationHours"]
    );
    let listed = search["available"]
        .as_array()
        .map(|vehicles| vehicles.iter().any(|v| v["id"] == vehicle_id.as_str()))
        .unwrap_or(false);
    if !listed {
        bail!("el vehículo registrado no aparece como disponible");
    }

    let booking_payload = json!({
        "vehicleId": vehicle_id,
        "customerId": "smoke-test",
        "fromPincode": "474009",
        "toPincode": "410099",
        "startTime": start
    });
    let booked = expect(
        client
            .post(format!("{}/api/bookings", base_url))
            .json(&booking_payload),
        "Crear reserva",
        StatusCode::CREATED,
    )
    .await?;
    let booking_id = booked["booking"]["id"]
        .as_str()
        .context("respuesta sin booking.id")?
        .to_string();
    println!(
        "   📅 {} → {}",
        booked["booking"]["startTime"], booked["booking"]["endTime"]
    );

    expect(
        client
            .post(format!("{}/api/bookings", base_url))
            .json(&booking_payload),
        "Reserva solapada rechazada",
        StatusCode::CONFLICT,
    )
    .await?;

    expect(
        client.delete(format!("{}/api/vehicles/{}", base_url, vehicle_id)),
        "Borrado bloqueado por reserva activa",
        StatusCode::CONFLICT,
    )
    .await?;

    // Limpieza
    expect(
        client.delete(format!("{}/api/bookings/{}", base_url, booking_id)),
        "Cancelar reserva",
        StatusCode::OK,
    )
    .await?;
    expect(
        client.delete(format!("{}/api/vehicles/{}", base_url, vehicle_id)),
        "Eliminar vehículo",
        StatusCode::OK,
    )
    .await?;

    println!();
    println!("{}", "🎉 Escenario completado".bright_green().bold());
    Ok(())
}
