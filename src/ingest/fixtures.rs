/// Test fixtures: representative CSV exports from the weather station.
///
/// Column layout mirrors the consolidated station workbook:
///   Fecha, Año, Sem, Temperatura (ºC), Humedad Relativa (%),
///   Radiación Solar (W/m²), Velocidad de Viento Promedio (km/h),
///   Dirección de Viento Predominante, Precipitación (mm)
///
/// Only `Fecha` and `Humedad Relativa (%)` are read; the other columns are
/// there so column lookup is exercised against the real header.

/// Six hourly rows; the fourth has an unparseable date and must be dropped.
pub(crate) fn fixture_station_export_csv() -> &'static str {
    "Fecha,Año,Sem,Temperatura (ºC),Humedad Relativa (%),Radiación Solar (W/m²),Velocidad de Viento Promedio (km/h),Dirección de Viento Predominante,Precipitación (mm)\n\
     2025-03-10 00:00:00,2025,11,13.1,88,0,3.2,SO,0\n\
     2025-03-10 01:00:00,2025,11,12.8,91 %,0,2.9,SO,0\n\
     2025-03-10 02:00:00,2025,11,12.6,92.4,0,2.5,S,0\n\
     sin fecha,2025,11,12.5,93,0,2.4,S,0\n\
     2025-03-10 04:00:00,2025,11,12.4,94,0,2.2,S,0.2\n\
     2025-03-10 05:00:00,2025,11,12.3,93,0,2.0,S,0.4\n"
}

/// Semicolon-delimited export with decimal commas and day-first dates.
pub(crate) fn fixture_semicolon_export_csv() -> &'static str {
    "Fecha;Humedad Relativa (%);Temperatura (ºC)\n\
     10/03/2025 00:00;90,0;13,1\n\
     10/03/2025 01:00;91,5;12,8\n"
}

/// One daily file with readings at 08:00 and 09:00 on `date`.
pub(crate) fn fixture_daily_file_csv(date: &str, humidity: f64) -> String {
    format!(
        "Fecha,Humedad Relativa (%)\n{date} 08:00:00,{humidity}\n{date} 09:00:00,{humidity}\n"
    )
}
