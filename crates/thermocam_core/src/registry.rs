//! Descoberta da câmera: associa o nome lógico ao IP de origem dos pacotes.
//!
//! Política padrão: o primeiro IP visto fica associado para sempre.
//! Com `discovery_window` definido, a câmera pode trocar de IP enquanto o
//! processo for mais novo que a janela; depois disso a associação congela.

use std::net::IpAddr;
use std::time::Duration;

/// Resultado de um pacote vindo do nome da câmera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Primeira associação
    Bound(IpAddr),
    /// Troca de IP dentro da janela de descoberta
    Rebound { previous: IpAddr, current: IpAddr },
    /// Mesmo IP já associado
    Unchanged(IpAddr),
    /// IP diferente, associação mantida
    Ignored { bound: IpAddr, offered: IpAddr },
}

/// Registro em memória da câmera (uma única por processo).
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    camera_device: String,
    camera_ip: Option<IpAddr>,
    discovery_window: Option<Duration>,
}

impl DeviceRegistry {
    pub fn new(camera_device: impl Into<String>, discovery_window: Option<Duration>) -> Self {
        Self {
            camera_device: camera_device.into(),
            camera_ip: None,
            discovery_window,
        }
    }

    pub fn is_camera(&self, device: &str) -> bool {
        device == self.camera_device
    }

    /// IP associado, se a câmera já foi vista.
    pub fn camera_ip(&self) -> Option<IpAddr> {
        self.camera_ip
    }

    /// Registra um pacote da câmera vindo de `source`.
    ///
    /// `elapsed` é o tempo desde o início do processo.
    pub fn observe(&mut self, source: IpAddr, elapsed: Duration) -> Discovery {
        let Some(bound) = self.camera_ip else {
            self.camera_ip = Some(source);
            return Discovery::Bound(source);
        };

        if bound == source {
            return Discovery::Unchanged(bound);
        }

        match self.discovery_window {
            Some(window) if elapsed < window => {
                self.camera_ip = Some(source);
                Discovery::Rebound {
                    previous: bound,
                    current: source,
                }
            }
            _ => Discovery::Ignored {
                bound,
                offered: source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const A: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 10));
    const B: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 22));

    #[test]
    fn starts_unbound() {
        let reg = DeviceRegistry::new("cam_a_5", None);
        assert_eq!(reg.camera_ip(), None);
        assert!(reg.is_camera("cam_a_5"));
        assert!(!reg.is_camera("pir_s_5"));
    }

    #[test]
    fn first_seen_wins() {
        let mut reg = DeviceRegistry::new("cam_a_5", None);
        assert_eq!(reg.observe(A, Duration::ZERO), Discovery::Bound(A));
        assert_eq!(reg.observe(A, Duration::from_secs(1)), Discovery::Unchanged(A));
        assert_eq!(
            reg.observe(B, Duration::from_secs(2)),
            Discovery::Ignored { bound: A, offered: B }
        );
        assert_eq!(reg.camera_ip(), Some(A));
    }

    #[test]
    fn window_allows_rebinding_while_open() {
        let mut reg = DeviceRegistry::new("cam_a_5", Some(Duration::from_secs(300)));
        reg.observe(A, Duration::from_secs(5));
        assert_eq!(
            reg.observe(B, Duration::from_secs(60)),
            Discovery::Rebound { previous: A, current: B }
        );
        assert_eq!(reg.camera_ip(), Some(B));
    }

    #[test]
    fn window_freezes_binding_after_closing() {
        let mut reg = DeviceRegistry::new("cam_a_5", Some(Duration::from_secs(300)));
        reg.observe(A, Duration::from_secs(5));
        assert_eq!(
            reg.observe(B, Duration::from_secs(300)),
            Discovery::Ignored { bound: A, offered: B }
        );
        assert_eq!(reg.camera_ip(), Some(A));
    }

    #[test]
    fn late_first_sighting_still_binds() {
        let mut reg = DeviceRegistry::new("cam_a_5", Some(Duration::from_secs(300)));
        assert_eq!(reg.observe(B, Duration::from_secs(900)), Discovery::Bound(B));
    }
}
