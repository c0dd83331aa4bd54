// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical user-facing prompt texts.

pub const MORNING: &str = "👋 ¡Buen día! Recuerda tomar tu Daily ✨\n\n\
Aquí tienes un formato sencillo que puedes seguir:\n\n\
📌 Hoy me enfocaré en:\n\
1. Resolver el algoritmo \"Two Sum\".\n\
2. Aprender sobre \"Reactive Forms en Angular\".\n\n\
Recuerda: sé breve y específico para mantener el enfoque.\n\
¡Tú puedes con todo! 🌟🚀";

pub const ACK_MORNING: &str = "✅ ¡Recibido! Gracias por compartir tu daily.\n\
🌞 ¡Que tengas un día productivo y lleno de logros! 🚀";

pub const EVENING: &str = "👋 ¡Hola de nuevo! Espero que hayas tenido un día increíble. ✨\n\n\
Cuéntame, ¿cómo te fue hoy? ¿Lograste cumplir los objetivos que te propusiste esta mañana?\n\n\
Recuerda que cada pequeño logro cuenta mucho, ¡estoy seguro que diste lo mejor de ti! 🌟😊";

pub const FOLLOWUP: &str = "🌈 ¡Ánimo! A veces los días no salen como planeamos, y está bien. 😊\n\n\
¿Me cuentas qué te dificultó cumplir con tus objetivos hoy? Entenderlo nos ayudará a mejorar mañana.\n\n\
Recuerda que lo importante es intentarlo y seguir adelante. ¡Estoy aquí para apoyarte! ✨💪";

pub const CONGRATS_PREFIX: &str = "🎉 ¡Excelente! Parece que cumpliste tus objetivos de hoy.\n\n";
